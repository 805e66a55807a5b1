pub const PRODUCE_LBS_PER_STUDENT_PER_YEAR: f64 = 75.0;
pub const OPERATING_JOBS_PER_SCHOOL: f64 = 2.0;
pub const CONSTRUCTION_JOBS_PER_SCHOOL: f64 = 11.58;
pub const CO2_OFFSET_LBS_PER_SQFT: f64 = 5.93;
pub const LBS_PER_TON: f64 = 2000.0;
pub const VALUE_PER_PRODUCE_LB: f64 = 2.3;
pub const STATEWIDE_SCHOOL_TARGET: f64 = 1200.0;
pub const STATEWIDE_ENDOWMENT: f64 = 5_000_000_000.0;

pub const SERIES_START_YEAR: i32 = 2028;
pub const SERIES_END_YEAR: i32 = 2078;

pub const MEALS_PER_STUDENT_PER_YEAR: f64 = 180.0;
pub const PRODUCE_PER_MEAL_LBS: f64 = 0.25;
pub const GROW_CYCLES_PER_YEAR: f64 = 4.0;
pub const CONSTRUCTION_COST_PER_SQFT: f64 = 85.0;
pub const OPERATING_COST_PER_SQFT_PER_YEAR: f64 = 12.0;
pub const SQFT_PER_GREENHOUSE: f64 = 15_000.0;

#[derive(Debug, Clone, Copy)]
pub struct ImpactInput {
    pub school_count: f64,
    pub avg_students_per_school: f64,
    pub avg_greenhouse_sqft: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ImpactMetrics {
    pub total_students: f64,
    pub total_sqft: f64,
    pub annual_produce_lbs: f64,
    pub jobs_fte: f64,
    pub construction_jobs: i64,
    pub annual_co2_tons: i64,
    pub annual_value: f64,
    pub endowment_share: f64,
}

pub fn impact_metrics(input: ImpactInput) -> ImpactMetrics {
    let total_students = input.school_count * input.avg_students_per_school;
    let total_sqft = input.school_count * input.avg_greenhouse_sqft;
    let annual_produce_lbs = total_students * PRODUCE_LBS_PER_STUDENT_PER_YEAR;

    ImpactMetrics {
        total_students,
        total_sqft,
        annual_produce_lbs,
        jobs_fte: input.school_count * OPERATING_JOBS_PER_SCHOOL,
        construction_jobs: (input.school_count * CONSTRUCTION_JOBS_PER_SCHOOL).round() as i64,
        annual_co2_tons: (total_sqft * CO2_OFFSET_LBS_PER_SQFT / LBS_PER_TON).round() as i64,
        annual_value: annual_produce_lbs * VALUE_PER_PRODUCE_LB,
        endowment_share: input.school_count / STATEWIDE_SCHOOL_TARGET * STATEWIDE_ENDOWMENT,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EndowmentYear {
    pub year: i32,
    pub corpus: i64,
    pub annual_draw: i64,
    pub cumulative_draws: i64,
}

// The corpus compounds on the unrounded carry; only the stored values are
// rounded to whole dollars.
pub fn endowment_series(initial_corpus: f64, draw_rate: f64, growth_rate: f64) -> Vec<EndowmentYear> {
    let mut series = Vec::with_capacity((SERIES_END_YEAR - SERIES_START_YEAR + 1) as usize);
    let mut corpus = initial_corpus;
    let mut cumulative_draws = 0.0;

    for year in SERIES_START_YEAR..=SERIES_END_YEAR {
        let annual_draw = corpus * draw_rate;
        cumulative_draws += annual_draw;

        series.push(EndowmentYear {
            year,
            corpus: corpus.round() as i64,
            annual_draw: annual_draw.round() as i64,
            cumulative_draws: cumulative_draws.round() as i64,
        });

        corpus *= 1.0 + growth_rate - draw_rate;
    }

    series
}

#[derive(Debug, Clone, Copy)]
pub struct ClusterMetrics {
    pub total_produce_needed_lbs: f64,
    pub avg_yield_per_sqft: f64,
    pub sqft_needed: i64,
    pub greenhouse_count: i64,
    pub total_investment: i64,
    pub annual_operating_cost: i64,
    pub cost_per_meal: f64,
}

pub fn cluster_metrics(total_enrollment: f64, yields_per_sqft: &[f64]) -> Option<ClusterMetrics> {
    if total_enrollment <= 0.0 || yields_per_sqft.is_empty() {
        return None;
    }

    let avg_yield = yields_per_sqft.iter().sum::<f64>() / yields_per_sqft.len() as f64;
    if avg_yield <= 0.0 {
        return None;
    }

    let annual_meals = total_enrollment * MEALS_PER_STUDENT_PER_YEAR;
    let total_produce_needed_lbs = annual_meals * PRODUCE_PER_MEAL_LBS;
    let sqft_needed = (total_produce_needed_lbs / (avg_yield * GROW_CYCLES_PER_YEAR)).ceil();
    let annual_operating_cost = sqft_needed * OPERATING_COST_PER_SQFT_PER_YEAR;

    Some(ClusterMetrics {
        total_produce_needed_lbs,
        avg_yield_per_sqft: avg_yield,
        sqft_needed: sqft_needed as i64,
        greenhouse_count: (sqft_needed / SQFT_PER_GREENHOUSE).ceil() as i64,
        total_investment: (sqft_needed * CONSTRUCTION_COST_PER_SQFT) as i64,
        annual_operating_cost: annual_operating_cost as i64,
        cost_per_meal: annual_operating_cost / annual_meals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn impact_metrics_match_statewide_scenario() {
        let metrics = impact_metrics(ImpactInput {
            school_count: 6.0,
            avg_students_per_school: 938.0,
            avg_greenhouse_sqft: 7500.0,
        });

        assert_eq!(metrics.total_students, 5628.0);
        assert_eq!(metrics.total_sqft, 45_000.0);
        assert_eq!(metrics.annual_produce_lbs, 422_100.0);
        assert_eq!(metrics.jobs_fte, 12.0);
        assert_eq!(metrics.construction_jobs, 69);
        assert_eq!(metrics.annual_co2_tons, 133);
        assert!((metrics.annual_value - 970_830.0).abs() < 1e-6);
        assert!((metrics.endowment_share - 25_000_000.0).abs() < 1e-3);
    }

    #[test]
    fn endowment_series_spans_fifty_one_years() {
        let series = endowment_series(5_000_000_000.0, 0.045, 0.07);

        assert_eq!(series.len(), 51);
        assert_eq!(series[0].year, 2028);
        assert_eq!(series[0].corpus, 5_000_000_000);
        assert_eq!(series[50].year, 2078);

        for pair in series.windows(2) {
            assert!(pair[1].cumulative_draws >= pair[0].cumulative_draws);
        }
    }

    #[test]
    fn endowment_corpus_holds_when_draw_matches_growth() {
        let series = endowment_series(1000.0, 0.05, 0.05);

        assert!(series.iter().all(|point| point.corpus == 1000));
        assert_eq!(series[0].annual_draw, 50);
    }

    #[test]
    fn cluster_metrics_match_district_scenario() {
        let metrics = cluster_metrics(5000.0, &[25.0, 35.0]).expect("positive inputs");

        assert_eq!(metrics.total_produce_needed_lbs, 225_000.0);
        assert_eq!(metrics.avg_yield_per_sqft, 30.0);
        assert_eq!(metrics.sqft_needed, 1875);
        assert_eq!(metrics.greenhouse_count, 1);
        assert_eq!(metrics.total_investment, 159_375);
        assert_eq!(metrics.annual_operating_cost, 22_500);
        assert!((metrics.cost_per_meal - 0.025).abs() < 1e-9);
    }

    #[test]
    fn cluster_metrics_guard_division_by_zero() {
        assert!(cluster_metrics(5000.0, &[]).is_none());
        assert!(cluster_metrics(5000.0, &[0.0, 0.0]).is_none());
        assert!(cluster_metrics(0.0, &[25.0]).is_none());
    }

    proptest! {
        #[test]
        fn endowment_series_is_well_formed(
            corpus in 1_000_000.0f64..10_000_000_000.0,
            draw_rate in 0.0f64..0.2,
            growth_rate in 0.0f64..0.2,
        ) {
            let series = endowment_series(corpus, draw_rate, growth_rate);
            prop_assert_eq!(series.len(), 51);
            prop_assert_eq!(series[0].corpus, corpus.round() as i64);

            for pair in series.windows(2) {
                prop_assert!(pair[1].cumulative_draws >= pair[0].cumulative_draws);
            }
        }

        #[test]
        fn cluster_metrics_stay_finite(
            enrollment in 1.0f64..1_000_000.0,
            yield_a in 0.1f64..100.0,
            yield_b in 0.1f64..100.0,
        ) {
            let metrics = cluster_metrics(enrollment, &[yield_a, yield_b]).unwrap();
            prop_assert!(metrics.cost_per_meal.is_finite());
            prop_assert!(metrics.sqft_needed >= 1);
            prop_assert!(metrics.greenhouse_count >= 1);
        }
    }
}
