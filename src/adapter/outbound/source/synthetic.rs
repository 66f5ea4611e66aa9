//! Synthetic odds generator.
//!
//! Produces one base book per fixture and then a per-bookmaker copy with
//! every price jittered by -5%..+8%, which regularly opens small
//! cross-bookmaker arbitrages. Bookmakers also spell some team names
//! differently so the matcher and alias table have something to do.

use async_trait::async_trait;
use chrono::{DateTime, Duration, DurationRound, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::RawOddsRecord;
use crate::error::Result;
use crate::port::OddsSource;

const FOOTBALL: &[(&str, &str)] = &[
    ("Manchester United", "Liverpool"),
    ("Real Madrid", "Barcelona"),
    ("Bayern Munich", "Borussia Dortmund"),
    ("Paris Saint-Germain", "Marseille"),
    ("Juventus", "AC Milan"),
    ("Arsenal", "Chelsea"),
    ("Atletico Madrid", "Valencia"),
    ("Inter", "Napoli"),
];

const BASKETBALL: &[(&str, &str)] = &[
    ("Lakers", "Warriors"),
    ("Celtics", "Heat"),
    ("Bucks", "76ers"),
    ("Nuggets", "Suns"),
    ("Mavericks", "Clippers"),
];

const ESPORTS: &[(&str, &str)] = &[
    ("NAVI", "FaZe"),
    ("Liquid", "G2"),
    ("Astralis", "Vitality"),
    ("Cloud9", "NiP"),
];

/// How some bookmakers write certain teams.
const SPELLINGS: &[(&str, &str)] = &[
    ("Manchester United", "Man Utd"),
    ("Bayern Munich", "Bayern München"),
    ("Paris Saint-Germain", "PSG"),
];

/// Configuration for the synthetic source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticSourceConfig {
    /// Bookmakers to simulate.
    #[serde(default = "default_bookmakers")]
    pub bookmakers: Vec<String>,

    /// RNG seed; unset draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_bookmakers() -> Vec<String> {
    ["mostbet", "stake", "leon", "parimatch", "1xbet"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for SyntheticSourceConfig {
    fn default() -> Self {
        Self {
            bookmakers: default_bookmakers(),
            seed: None,
        }
    }
}

/// One outcome price of the base book, before per-bookmaker jitter.
struct BaseQuote {
    sport: &'static str,
    market: &'static str,
    line: Option<Decimal>,
    home: &'static str,
    away: &'static str,
    outcome: String,
    odds: Decimal,
    start_time: DateTime<Utc>,
}

/// Random but plausible odds across several bookmakers.
pub struct SyntheticSource {
    bookmakers: Vec<String>,
    rng: Mutex<StdRng>,
}

impl SyntheticSource {
    pub fn new(config: &SyntheticSourceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            bookmakers: config.bookmakers.clone(),
            rng: Mutex::new(rng),
        }
    }

    /// Generate one snapshot as observed at `now`.
    pub fn generate(&self, now: DateTime<Utc>) -> Vec<RawOddsRecord> {
        let mut rng = self.rng.lock();
        let kickoff_base = now.duration_trunc(Duration::hours(1)).unwrap_or(now);

        let mut base = Vec::new();
        football(&mut rng, kickoff_base, &mut base);
        basketball(&mut rng, kickoff_base, &mut base);
        esports(&mut rng, kickoff_base, &mut base);

        let mut records = Vec::with_capacity(base.len() * self.bookmakers.len());
        for (idx, bookmaker) in self.bookmakers.iter().enumerate() {
            for quote in &base {
                let factor = Decimal::new(rng.gen_range(95..=108), 2);
                let odds = (quote.odds * factor)
                    .round_dp(2)
                    .clamp(Decimal::new(101, 2), Decimal::from(50));

                let event_name = format!(
                    "{}{}{}",
                    spelling(quote.home, idx),
                    if idx % 2 == 0 { " vs " } else { " v " },
                    spelling(quote.away, idx)
                );
                records.push(RawOddsRecord {
                    sport: quote.sport.to_string(),
                    market_type: quote.market.to_string(),
                    line: quote.line,
                    url: format!(
                        "https://{bookmaker}.example/mock/{}",
                        event_name.replace(' ', "-")
                    ),
                    event_name,
                    outcome_name: quote.outcome.clone(),
                    odd_value: odds,
                    bookmaker_id: bookmaker.clone(),
                    start_time: Some(quote.start_time),
                    observed_at: now,
                });
            }
        }

        debug!(
            records = records.len(),
            bookmakers = self.bookmakers.len(),
            "Generated synthetic odds"
        );
        records
    }
}

#[async_trait]
impl OddsSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn fetch(&self) -> Result<Vec<RawOddsRecord>> {
        Ok(self.generate(Utc::now()))
    }
}

/// Odd-numbered bookmakers use the alternative spelling.
fn spelling(team: &'static str, bookmaker_idx: usize) -> &'static str {
    if bookmaker_idx % 2 == 0 {
        return team;
    }
    SPELLINGS
        .iter()
        .find(|(canonical, _)| *canonical == team)
        .map_or(team, |(_, alt)| *alt)
}

fn signed(line: Decimal) -> String {
    if line.is_sign_negative() {
        line.to_string()
    } else {
        format!("+{line}")
    }
}

fn price(rng: &mut StdRng, low_cents: i64, high_cents: i64) -> Decimal {
    Decimal::new(rng.gen_range(low_cents..=high_cents), 2)
}

/// Scale prices down so the book carries a bookmaker margin.
fn with_margin(odds: &mut [Decimal], floor: Decimal, target: Decimal) {
    let implied: Decimal = odds.iter().map(|o| Decimal::ONE / *o).sum();
    if implied < floor {
        let factor = target / implied;
        for o in odds.iter_mut() {
            *o = (*o / factor).round_dp(2).max(Decimal::new(101, 2));
        }
    }
}

fn fixtures(
    rng: &mut StdRng,
    pool: &'static [(&'static str, &'static str)],
    min: usize,
    max: usize,
) -> Vec<(&'static str, &'static str)> {
    let count = rng.gen_range(min..=max).min(pool.len());
    pool.choose_multiple(rng, count).copied().collect()
}

fn kickoff(rng: &mut StdRng, base: DateTime<Utc>, max_hours: i64) -> DateTime<Utc> {
    base + Duration::hours(rng.gen_range(1..=max_hours))
}

fn push_market(
    out: &mut Vec<BaseQuote>,
    sport: &'static str,
    market: &'static str,
    line: Option<Decimal>,
    (home, away): (&'static str, &'static str),
    start_time: DateTime<Utc>,
    outcomes: Vec<(String, Decimal)>,
) {
    for (outcome, odds) in outcomes {
        out.push(BaseQuote {
            sport,
            market,
            line,
            home,
            away,
            outcome,
            odds,
            start_time,
        });
    }
}

fn football(rng: &mut StdRng, base: DateTime<Utc>, out: &mut Vec<BaseQuote>) {
    for fixture in fixtures(rng, FOOTBALL, 3, 6) {
        let start = kickoff(rng, base, 48);

        let mut three_way = [price(rng, 150, 450), price(rng, 280, 420), price(rng, 150, 450)];
        with_margin(&mut three_way, Decimal::new(105, 2), Decimal::new(107, 2));
        push_market(
            out,
            "football",
            "Match Result",
            None,
            fixture,
            start,
            vec![
                (fixture.0.to_string(), three_way[0]),
                ("Draw".to_string(), three_way[1]),
                (fixture.1.to_string(), three_way[2]),
            ],
        );

        let line = *[Decimal::new(25, 1), Decimal::new(35, 1)]
            .choose(rng)
            .unwrap_or(&Decimal::new(25, 1));
        push_market(
            out,
            "football",
            "Total Goals",
            Some(line),
            fixture,
            start,
            vec![
                ("Over".to_string(), price(rng, 170, 230)),
                ("Under".to_string(), price(rng, 170, 230)),
            ],
        );
    }
}

fn basketball(rng: &mut StdRng, base: DateTime<Utc>, out: &mut Vec<BaseQuote>) {
    for fixture in fixtures(rng, BASKETBALL, 2, 4) {
        let start = kickoff(rng, base, 24);

        let mut two_way = [price(rng, 150, 300), price(rng, 150, 300)];
        with_margin(&mut two_way, Decimal::new(104, 2), Decimal::new(105, 2));
        push_market(
            out,
            "basketball",
            "Moneyline",
            None,
            fixture,
            start,
            vec![
                (fixture.0.to_string(), two_way[0]),
                (fixture.1.to_string(), two_way[1]),
            ],
        );

        let line = *[
            Decimal::new(2055, 1),
            Decimal::new(2155, 1),
            Decimal::new(2255, 1),
        ]
        .choose(rng)
        .unwrap_or(&Decimal::new(2155, 1));
        push_market(
            out,
            "basketball",
            "Total Points",
            Some(line),
            fixture,
            start,
            vec![
                ("Over".to_string(), price(rng, 185, 205)),
                ("Under".to_string(), price(rng, 185, 205)),
            ],
        );
    }
}

fn esports(rng: &mut StdRng, base: DateTime<Utc>, out: &mut Vec<BaseQuote>) {
    for fixture in fixtures(rng, ESPORTS, 2, 3) {
        let start = kickoff(rng, base, 12);

        let mut two_way = [price(rng, 140, 350), price(rng, 140, 350)];
        with_margin(&mut two_way, Decimal::new(104, 2), Decimal::new(105, 2));
        push_market(
            out,
            "csgo",
            "Match Winner",
            None,
            fixture,
            start,
            vec![
                (fixture.0.to_string(), two_way[0]),
                (fixture.1.to_string(), two_way[1]),
            ],
        );

        let line = if rng.gen_bool(0.5) {
            Decimal::new(-15, 1)
        } else {
            Decimal::new(15, 1)
        };
        push_market(
            out,
            "csgo",
            "Map Handicap",
            Some(line),
            fixture,
            start,
            vec![
                (format!("{} {}", fixture.0, signed(line)), price(rng, 175, 220)),
                (format!("{} {}", fixture.1, signed(-line)), price(rng, 175, 220)),
            ],
        );
    }
}
