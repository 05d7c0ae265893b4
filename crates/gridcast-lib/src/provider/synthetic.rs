//! Deterministic synthetic session data
//!
//! Stand-in data for sessions the upstream cannot supply yet, typically
//! future rounds. Generation is explicitly seeded so repeated requests for
//! the same event produce identical payloads, and the API layer marks every
//! synthetic response so callers can tell it apart from real data.

use crate::models::{DriverFeatures, EventInfo, SessionFeatures};

/// First season for which a missing schedule is substituted synthetically
pub const SYNTHETIC_FROM_SEASON: u16 = 2026;

/// Projected grid used for placeholder sessions: code, name, team, compound
const PROJECTED_GRID: [(&str, &str, &str, &str); 10] = [
    ("VER", "Max Verstappen", "Red Bull Racing", "Medium"),
    ("NOR", "Lando Norris", "McLaren", "Medium"),
    ("LEC", "Charles Leclerc", "Ferrari", "Medium"),
    ("HAM", "Lewis Hamilton", "Ferrari", "Medium"),
    ("PIA", "Oscar Piastri", "McLaren", "Medium"),
    ("RUS", "George Russell", "Mercedes", "Medium"),
    ("SAI", "Carlos Sainz", "Williams", "Hard"),
    ("ALO", "Fernando Alonso", "Aston Martin", "Medium"),
    ("ALB", "Alexander Albon", "Williams", "Hard"),
    ("TSU", "Yuki Tsunoda", "RB", "Soft"),
];

/// Fixed schedule served when a future season has no published calendar
const PROJECTED_SCHEDULE: [(&str, &str, &str); 10] = [
    ("Bahrain Grand Prix", "Sakhir", "Bahrain"),
    ("Saudi Arabian Grand Prix", "Jeddah", "Saudi Arabia"),
    ("Australian Grand Prix", "Melbourne", "Australia"),
    ("Japanese Grand Prix", "Suzuka", "Japan"),
    ("Chinese Grand Prix", "Shanghai", "China"),
    ("Miami Grand Prix", "Miami", "USA"),
    ("Emilia Romagna Grand Prix", "Imola", "Italy"),
    ("Monaco Grand Prix", "Monaco", "Monaco"),
    ("Canadian Grand Prix", "Montreal", "Canada"),
    ("Spanish Grand Prix", "Barcelona", "Spain"),
];

/// Small deterministic generator (splitmix64), seeded explicitly so tests
/// and repeated requests are reproducible without an external randomness
/// source
struct Prng(u64);

impl Prng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1)
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [lo, hi)
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Approximately normal with mean 0 and standard deviation 0.5
    /// (sum of three unit uniforms, recentered)
    fn pace_noise(&mut self) -> f64 {
        self.next_f64() + self.next_f64() + self.next_f64() - 1.5
    }
}

/// Seedable generator for placeholder sessions and schedules
pub struct SyntheticGenerator {
    seed: u64,
}

impl SyntheticGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed derived from the session identity, so the same event always
    /// yields the same placeholder data
    pub fn for_event(year: u16, round: u8) -> Self {
        Self::new(((year as u64) << 8) | round as u64)
    }

    /// Placeholder feature set for one race: the projected grid with lightly
    /// randomized pace figures and fixed strategy defaults
    pub fn session_features(&self, round: u8) -> SessionFeatures {
        let mut rng = Prng::new(self.seed);

        let drivers = PROJECTED_GRID
            .iter()
            .enumerate()
            .map(|(index, (code, name, team, compound))| DriverFeatures {
                code: (*code).to_string(),
                name: (*name).to_string(),
                team: (*team).to_string(),
                grid: (index + 1) as u32,
                start_compound: (*compound).to_string(),
                stops: 1,
                pace_delta: rng.pace_noise(),
                consistency: rng.uniform(0.2, 0.8),
            })
            .collect();

        SessionFeatures {
            event_name: format!("Round {round} (Simulation)"),
            is_wet: false,
            drivers,
            skipped: Vec::new(),
        }
    }

    /// Fixed projected schedule for a season without a published calendar
    pub fn event_schedule() -> Vec<EventInfo> {
        PROJECTED_SCHEDULE
            .iter()
            .enumerate()
            .map(|(index, (event_name, location, country))| EventInfo {
                round: (index + 1) as u8,
                event_name: (*event_name).to_string(),
                location: (*location).to_string(),
                country: (*country).to_string(),
            })
            .collect()
    }
}
