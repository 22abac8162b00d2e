use crate::entities::{BucketRow, HistogramBucket, SCORE_AMOUNT_SCALE};

pub const BUCKET_COUNT: usize = 10;
pub const BUCKET_WIDTH: f64 = SCORE_AMOUNT_SCALE / BUCKET_COUNT as f64;

/// `$start-$end` labels for the fixed buckets over [0, 5000).
pub fn bucket_labels() -> Vec<String> {
    (0..BUCKET_COUNT)
        .map(|index| {
            let start = index as f64 * BUCKET_WIDTH;
            let end = (index + 1) as f64 * BUCKET_WIDTH;
            format!("${:.0}-${:.0}", start, end)
        })
        .collect()
}

/// Same numbering as Postgres `width_bucket(amount, 0, 5000, 10)`: 0 below
/// the domain, 1..=10 inside, 11 at or above 5000.
pub fn width_bucket(amount: f64) -> i32 {
    if amount.is_nan() || amount < 0.0 {
        return 0;
    }
    if amount >= SCORE_AMOUNT_SCALE {
        return BUCKET_COUNT as i32 + 1;
    }
    (amount / BUCKET_WIDTH).floor() as i32 + 1
}

/// Places grouped 1-based bucket counts into the 10 fixed slots. Buckets
/// outside 1..=10 are dropped, so amounts of 5000 and above never show up:
/// a known lossy upper boundary.
pub fn bucket_histogram(rows: &[BucketRow]) -> Vec<HistogramBucket> {
    let mut counts = [0i64; BUCKET_COUNT];
    for row in rows {
        let index = i64::from(row.bucket) - 1;
        if (0..BUCKET_COUNT as i64).contains(&index) {
            counts[index as usize] = row.count;
        }
    }
    bucket_labels()
        .into_iter()
        .zip(counts)
        .map(|(label, count)| HistogramBucket { label, count })
        .collect()
}

/// Groups raw amounts the way the store's `GROUP BY width_bucket(..)` does.
pub fn group_amounts<I>(amounts: I) -> Vec<BucketRow>
where
    I: IntoIterator<Item = f64>,
{
    let mut counts = std::collections::BTreeMap::<i32, i64>::new();
    for amount in amounts {
        *counts.entry(width_bucket(amount)).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(bucket, count)| BucketRow { bucket, count })
        .collect()
}
