use crate::domain::models::DimensionScore;
use std::collections::BTreeMap;

/// Mean score per dimension name, rounded to two decimals.
/// Dimensions without scores never appear in the result.
pub fn average_by_dimension(scores: &[DimensionScore]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<&str, (i64, u32)> = BTreeMap::new();
    for row in scores {
        let entry = totals.entry(row.dimension.as_str()).or_insert((0, 0));
        entry.0 += i64::from(row.score);
        entry.1 += 1;
    }

    totals
        .into_iter()
        .map(|(name, (sum, count))| (name.to_string(), round2(sum as f64 / f64::from(count))))
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(dimension: &str, score: i32) -> DimensionScore {
        DimensionScore {
            dimension: dimension.to_string(),
            score,
        }
    }

    #[test]
    fn test_average_per_dimension() {
        let rows = vec![score("Demandas", 4), score("Demandas", 2), score("Controle", 5)];
        let averages = average_by_dimension(&rows);

        assert_eq!(averages.len(), 2);
        assert_eq!(averages["Demandas"], 3.0);
        assert_eq!(averages["Controle"], 5.0);
    }

    #[test]
    fn test_empty_input_gives_empty_map() {
        assert!(average_by_dimension(&[]).is_empty());
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let rows = vec![score("Apoio", 1), score("Apoio", 2), score("Apoio", 2)];
        assert_eq!(average_by_dimension(&rows)["Apoio"], 1.67);

        let rows = vec![score("Cargo", 1), score("Cargo", 1), score("Cargo", 2)];
        assert_eq!(average_by_dimension(&rows)["Cargo"], 1.33);
    }

    #[test]
    fn test_negative_and_large_scores() {
        let rows = vec![score("X", i32::MAX), score("X", i32::MAX), score("Y", -3)];
        let averages = average_by_dimension(&rows);
        assert_eq!(averages["X"], f64::from(i32::MAX));
        assert_eq!(averages["Y"], -3.0);
    }

    #[test]
    fn test_dimension_names_are_case_sensitive() {
        let rows = vec![score("demandas", 1), score("Demandas", 5)];
        let averages = average_by_dimension(&rows);
        assert_eq!(averages.len(), 2);
    }
}
