// Synthetic data used when the store cannot be reached.
// All randomness comes from one Pcg64Mcg stream so a fixed seed reproduces
// a dataset exactly.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use uuid::Uuid;

use crate::entities::{
    AnomalyRecord, DailyRow, FilterCriteria, HourRow, LiveTransaction, TotalsRow, UserProfile,
    SCORE_AMOUNT_SCALE,
};
use crate::value_objects::UserIdMatch;

const USER_IDS: &[&str] = &[
    "user_123",
    "user_456",
    "user_789",
    "user_101",
    "user_202",
    "user_303",
    "user_404",
    "user_505",
    "user_606",
    "user_707",
    "customer_1234",
    "customer_5678",
    "customer_9012",
    "customer_3456",
    "acct_7890123",
    "acct_4567890",
    "acct_1234567",
    "acct_8901234",
];

const LOCATIONS: &[&str] = &[
    "New York, USA",
    "London, UK",
    "Sydney, Australia",
    "Berlin, Germany",
    "Tokyo, Japan",
    "Paris, France",
    "Toronto, Canada",
    "Singapore",
    "São Paulo, Brazil",
    "Mumbai, India",
    "Amsterdam, Netherlands",
    "Dubai, UAE",
    "Seoul, South Korea",
    "Hong Kong",
    "Barcelona, Spain",
    "Cape Town, South Africa",
    "Moscow, Russia",
    "Mexico City, Mexico",
];

const DESCRIPTIONS: &[&str] = &[
    "Unusual transaction amount for this user",
    "Transaction from unusual location",
    "Multiple transactions in short time window",
    "Amount exceeds typical spending pattern",
    "Transaction outside normal hours",
    "Unusual merchant category",
    "Multiple failed authentication attempts",
    "Rapid succession of small transactions",
    "New device used for transaction",
    "Transaction amount significantly above average",
    "Suspicious IP address detected",
    "Unusual transaction frequency",
    "Transaction velocity exceeds normal pattern",
    "Abnormal transaction category for user profile",
    "Transaction matches known fraud pattern",
    "Unusual sequence of transactions detected",
    "Geolocation inconsistency detected",
    "Large purchase after a period of inactivity",
    "Unusual time of day for transaction type",
    "Multiple currency conversions in short period",
];

const STREAM_LOCATIONS: &[&str] = &["New York", "London", "Tokyo", "Sydney", "Berlin"];

const MERCHANT_CATEGORIES: &[&str] = &[
    "grocery",
    "electronics",
    "travel",
    "restaurants",
    "fuel",
    "entertainment",
    "health",
];

const DEVICE_TYPES: &[&str] = &["mobile", "desktop", "tablet"];

pub const MIN_SYNTHETIC_SCORE: f64 = 0.1;
pub const MAX_SYNTHETIC_SCORE: f64 = 0.98;

pub struct SyntheticGenerator {
    rng: Pcg64Mcg,
}

impl SyntheticGenerator {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Pcg64Mcg::from_entropy(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        seed.map(Self::seeded).unwrap_or_else(Self::from_entropy)
    }

    /// `count` anomalies with timestamps uniform in `[start, end]`, newest
    /// first.
    pub fn anomalies(
        &mut self,
        count: usize,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<AnomalyRecord> {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let span_ms = (end - start).num_milliseconds().max(0);
        let batch = Utc::now().timestamp_millis();

        let mut records: Vec<AnomalyRecord> = (0..count)
            .map(|index| {
                let offset_ms = if span_ms == 0 {
                    0
                } else {
                    self.rng.gen_range(0..=span_ms)
                };
                let timestamp = start + Duration::milliseconds(offset_ms);
                let user_id = pick(&mut self.rng, USER_IDS);
                let location = pick(&mut self.rng, LOCATIONS);
                let description = pick(&mut self.rng, DESCRIPTIONS);
                let amount = self.skewed_amount();
                let anomaly_score = self.noisy_score(amount);
                AnomalyRecord {
                    id: format!("anomaly-{}-{}", index + 1, batch),
                    user_id,
                    amount,
                    timestamp,
                    location,
                    description,
                    anomaly_score,
                }
            })
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    /// 70% in [100, 1000), 20% in [1000, 3000), 10% in [3000, 5000), to the
    /// cent.
    pub fn skewed_amount(&mut self) -> f64 {
        let tier: f64 = self.rng.gen();
        let (low, high) = if tier < 0.7 {
            (100.0, 1000.0)
        } else if tier < 0.9 {
            (1000.0, 3000.0)
        } else {
            (3000.0, 5000.0)
        };
        round2(self.rng.gen_range(low..high)).min(high - 0.01)
    }

    fn noisy_score(&mut self, amount: f64) -> f64 {
        let adjustment = round2(self.rng.gen_range(-0.2..0.2));
        (amount / SCORE_AMOUNT_SCALE + adjustment).clamp(MIN_SYNTHETIC_SCORE, MAX_SYNTHETIC_SCORE)
    }

    pub fn live_transaction(&mut self, now: DateTime<Utc>) -> LiveTransaction {
        let id = Uuid::new_v4().simple().to_string();
        LiveTransaction {
            id: format!("txn-{}", &id[..8]),
            user_id: format!("user{}", self.rng.gen_range(0..1000)),
            amount: round2(self.rng.gen_range(0.0..1000.0)),
            timestamp: now,
            location: pick(&mut self.rng, STREAM_LOCATIONS),
            is_anomaly: self.rng.gen_bool(0.2),
            anomaly_score: Some(round2(self.rng.gen_range(0.0..1.0))),
        }
    }

    /// One profile for `user_id`, or the most recently updated `limit`
    /// profiles of the whole user pool.
    pub fn user_profiles(
        &mut self,
        user_id: Option<&str>,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<UserProfile> {
        let ids: Vec<String> = match user_id {
            Some(id) => vec![id.to_string()],
            None => USER_IDS.iter().map(|id| id.to_string()).collect(),
        };
        let mut profiles: Vec<UserProfile> = ids
            .into_iter()
            .map(|id| self.profile(id, now))
            .collect();
        profiles.sort_by(|a, b| b.last_update.cmp(&a.last_update));
        profiles.truncate(limit);
        profiles
    }

    fn profile(&mut self, user_id: String, now: DateTime<Utc>) -> UserProfile {
        let location_count = self.rng.gen_range(1..=3);
        let merchant_count = self.rng.gen_range(1..=3);
        let device_count = self.rng.gen_range(1..=2);
        let usual_locations = sample(&mut self.rng, LOCATIONS, location_count);
        let merchant_categories = sample(&mut self.rng, MERCHANT_CATEGORIES, merchant_count);
        let device_types = sample(&mut self.rng, DEVICE_TYPES, device_count);
        let model_score = (usual_locations.len() as f64 * 0.1
            + merchant_categories.len() as f64 * 0.05
            + 0.5)
            .min(1.0);
        let minutes_ago = self.rng.gen_range(0..7 * 24 * 60);
        UserProfile {
            user_id,
            usual_locations,
            merchant_categories,
            device_types,
            avg_transaction_amount: round2(self.rng.gen_range(50.0..800.0)),
            model_score,
            last_update: Some(now - Duration::minutes(minutes_ago)),
        }
    }

    /// Processed-transaction counter consistent with `anomalies` flagged rows.
    pub fn totals(&mut self, anomalies: usize, now: DateTime<Utc>) -> TotalsRow {
        let per_anomaly = self.rng.gen_range(400..600);
        TotalsRow {
            total_transactions: anomalies as i64 * per_anomaly,
            last_updated: Some(now),
            total_anomalies: anomalies as i64,
        }
    }
}

/// Applies the same criteria as the store path. The user id comparison is
/// case-insensitive for substring matching and exact otherwise.
pub fn filter_records(
    records: &[AnomalyRecord],
    criteria: &FilterCriteria,
    mode: UserIdMatch,
) -> Vec<AnomalyRecord> {
    let needle = criteria.user_id.as_deref().map(str::to_lowercase);
    let threshold = criteria.effective_score_threshold();
    records
        .iter()
        .filter(|record| criteria.start.map_or(true, |start| record.timestamp >= start))
        .filter(|record| criteria.end.map_or(true, |end| record.timestamp <= end))
        .filter(|record| {
            criteria
                .date
                .map_or(true, |day| record.timestamp.date_naive() == day)
        })
        .filter(|record| match (&needle, mode) {
            (None, _) => true,
            (Some(needle), UserIdMatch::Substring) => {
                record.user_id.to_lowercase().contains(needle.as_str())
            }
            (Some(_), UserIdMatch::Exact) => {
                criteria.user_id.as_deref() == Some(record.user_id.as_str())
            }
        })
        .filter(|record| threshold.map_or(true, |min| record.anomaly_score >= min))
        .cloned()
        .collect()
}

/// Groups records per UTC day with the store's score proxy
/// `min(avg(amount) / 5000, 1)`.
pub fn daily_rows(records: &[AnomalyRecord]) -> Vec<DailyRow> {
    let mut groups: BTreeMap<NaiveDate, (i64, f64)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.timestamp.date_naive()).or_default();
        entry.0 += 1;
        entry.1 += record.amount;
    }
    groups
        .into_iter()
        .map(|(day, (count, total))| DailyRow {
            day,
            count,
            avg_score: Some((total / count as f64 / SCORE_AMOUNT_SCALE).min(1.0)),
        })
        .collect()
}

/// Groups records newer than `since` by UTC hour of day.
pub fn hour_rows(records: &[AnomalyRecord], since: DateTime<Utc>) -> Vec<HourRow> {
    let mut groups: BTreeMap<u32, i64> = BTreeMap::new();
    for record in records.iter().filter(|record| record.timestamp >= since) {
        *groups.entry(record.timestamp.hour()).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|(hour, count)| HourRow {
            hour: Some(f64::from(hour)),
            count,
        })
        .collect()
}

fn pick(rng: &mut Pcg64Mcg, pool: &[&str]) -> String {
    pool.choose(rng).copied().unwrap_or_default().to_string()
}

fn sample(rng: &mut Pcg64Mcg, pool: &[&str], amount: usize) -> Vec<String> {
    pool.iter()
        .choose_multiple(rng, amount)
        .into_iter()
        .map(|item| item.to_string())
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
