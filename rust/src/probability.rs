//! Completion-time probabilities under a normal approximation.
//!
//! Total project duration is modelled as Normal(mean = project duration,
//! variance = sum of job variances). By default every job contributes its
//! variance, not only the jobs on the critical path; this overstates the
//! spread for networks with many slack branches. `VarianceScope::CriticalPath`
//! gives the textbook PERT estimate instead.

use chrono::{Days, NaiveDate};

use crate::config::VarianceScope;
use crate::models::{TimeDirective, TimeInterval};
use crate::network::Activity;
use crate::propagation::JobReserve;

// Abramowitz & Stegun 7.1.26
const P: f64 = 0.3275911;
const A1: f64 = 0.254829592;
const A2: f64 = -0.284496736;
const A3: f64 = 1.421413741;
const A4: f64 = -1.453152027;
const A5: f64 = 1.061405429;

/// Standard normal cumulative distribution function.
///
/// Rational approximation of erf with absolute error below 7.5e-8.
/// Antisymmetric around zero and monotone non-decreasing.
pub fn normal_cdf(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    if z == 0.0 {
        return 0.5;
    }
    let x = z.abs() / std::f64::consts::SQRT_2;
    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    let erf = 1.0 - poly * (-x * x).exp();
    if z > 0.0 {
        0.5 * (1.0 + erf)
    } else {
        0.5 * (1.0 - erf)
    }
}

/// Sum of variances of the jobs selected by `scope`. Dummies never count.
pub fn completion_variance(
    activities: &[Activity],
    reserves: &[JobReserve],
    scope: VarianceScope,
    tolerance: f64,
) -> f64 {
    activities
        .iter()
        .zip(reserves)
        .filter(|(activity, _)| !activity.is_dummy())
        .filter(|(_, reserve)| match scope {
            VarianceScope::AllJobs => true,
            VarianceScope::CriticalPath => reserve.full_reserve.abs() <= tolerance,
        })
        .map(|(activity, _)| activity.variance)
        .sum()
}

/// Normal model of total project duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletionModel {
    pub mean: f64,
    pub variance: f64,
}

impl CompletionModel {
    pub fn new(mean: f64, variance: f64) -> Self {
        Self { mean, variance }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.max(0.0).sqrt()
    }

    /// Probability that the project completes by `time`.
    ///
    /// With zero variance the duration is certain: 1 at or after the mean,
    /// 0 before it.
    pub fn cumulative(&self, time: f64) -> f64 {
        let sd = self.std_dev();
        if sd > 0.0 {
            normal_cdf((time - self.mean) / sd)
        } else if time >= self.mean {
            1.0
        } else {
            0.0
        }
    }

    /// 21 bins of 5% of the mean each, the middle one centred on the mean.
    pub fn time_intervals(&self) -> Vec<TimeInterval> {
        (-10..=10)
            .map(|k| {
                let k = f64::from(k);
                self.interval(
                    self.mean * (1.0 + 0.05 * (k - 0.5)),
                    self.mean * (1.0 + 0.05 * (k + 0.5)),
                )
            })
            .collect()
    }

    /// 11 intervals symmetric around the mean, widening by 5% per side.
    pub fn confidence_intervals(&self) -> Vec<TimeInterval> {
        (0..=10)
            .map(|w| {
                let w = f64::from(w);
                self.interval(self.mean * (1.0 - 0.05 * w), self.mean * (1.0 + 0.05 * w))
            })
            .collect()
    }

    fn interval(&self, start: f64, end: f64) -> TimeInterval {
        TimeInterval {
            start,
            end,
            probability: self.cumulative(end) - self.cumulative(start),
        }
    }

    /// 11 target times from -50% to +50% of the mean in 10% steps.
    ///
    /// Probability is `0.5 * (1 + cumulative(time))`, which rescales the
    /// cumulative probability onto [0.5, 1]. When a project start date is
    /// given, each directive also carries the calendar date `start +
    /// ceil(time)` days.
    pub fn time_directives(&self, project_start: Option<NaiveDate>) -> Vec<TimeDirective> {
        (-5..=5)
            .map(|w| {
                let time = self.mean * (1.0 + 0.1 * f64::from(w));
                let date = project_start
                    .and_then(|start| start.checked_add_days(Days::new(time.max(0.0).ceil() as u64)));
                TimeDirective {
                    time_directive: time,
                    probability: 0.5 * (1.0 + self.cumulative(time)),
                    date,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ActivityKind;
    use proptest::prelude::*;

    fn activity(name: &str, variance: f64, dummy: bool) -> Activity {
        Activity {
            name: name.to_string(),
            kind: if dummy {
                ActivityKind::Dummy { after: 0 }
            } else {
                ActivityKind::Job
            },
            length: 1.0,
            variance,
        }
    }

    fn reserve(activity: u32, full_reserve: f64) -> JobReserve {
        JobReserve {
            activity,
            full_reserve,
            free_reserve: full_reserve,
        }
    }

    #[test]
    fn test_cdf_reference_values() {
        assert_eq!(normal_cdf(0.0), 0.5);
        assert!((normal_cdf(1.0) - 0.8413447).abs() < 1e-6);
        assert!((normal_cdf(-1.0) - 0.1586553).abs() < 1e-6);
        assert!((normal_cdf(1.959964) - 0.975).abs() < 1e-6);
        assert!((normal_cdf(3.0) - 0.9986501).abs() < 1e-6);
        assert_eq!(normal_cdf(f64::INFINITY), 1.0);
        assert_eq!(normal_cdf(f64::NEG_INFINITY), 0.0);
        assert!(normal_cdf(f64::NAN).is_nan());
    }

    #[test]
    fn test_variance_scopes() {
        let activities = vec![
            activity("A", 1.0, false),
            activity("B", 4.0, false),
            activity("A~1", 9.0, true),
        ];
        let reserves = vec![reserve(0, 0.0), reserve(1, 2.0), reserve(2, 0.0)];

        let all = completion_variance(&activities, &reserves, VarianceScope::AllJobs, 1e-9);
        assert!((all - 5.0).abs() < 1e-12);

        let critical =
            completion_variance(&activities, &reserves, VarianceScope::CriticalPath, 1e-9);
        assert!((critical - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_intervals_layout() {
        let model = CompletionModel::new(100.0, 25.0);
        let intervals = model.time_intervals();
        assert_eq!(intervals.len(), 21);

        let middle = &intervals[10];
        assert!((middle.start - 97.5).abs() < 1e-9);
        assert!((middle.end - 102.5).abs() < 1e-9);
        // +-0.5 sigma
        assert!((middle.probability - 0.3829249).abs() < 1e-6);

        for pair in intervals.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < 1e-9);
            assert!(((pair[0].end - pair[0].start) - 5.0).abs() < 1e-9);
        }
        let total: f64 = intervals.iter().map(|i| i.probability).sum();
        assert!(total > 0.999 && total <= 1.0 + 1e-9);
    }

    #[test]
    fn test_confidence_intervals() {
        let model = CompletionModel::new(20.0, 4.0);
        let intervals = model.confidence_intervals();
        assert_eq!(intervals.len(), 11);
        assert_eq!(intervals[0].probability, 0.0);
        // w = 2: [18, 22] is +-1 sigma
        assert!((intervals[2].probability - 0.6826895).abs() < 1e-6);
        for pair in intervals.windows(2) {
            assert!(pair[1].probability >= pair[0].probability);
        }
    }

    #[test]
    fn test_time_directives() {
        let model = CompletionModel::new(10.0, 1.0);
        let directives = model.time_directives(None);
        assert_eq!(directives.len(), 11);
        assert!((directives[0].time_directive - 5.0).abs() < 1e-9);
        assert!((directives[10].time_directive - 15.0).abs() < 1e-9);
        assert!((directives[5].probability - 0.75).abs() < 1e-12);
        assert!(directives.iter().all(|d| d.date.is_none()));
        for pair in directives.windows(2) {
            assert!(pair[1].probability >= pair[0].probability);
        }
    }

    #[test]
    fn test_directive_dates() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let model = CompletionModel::new(10.5, 1.0);
        let directives = model.time_directives(Some(start));
        // 10.5 -> 11 days
        assert_eq!(
            directives[5].date,
            NaiveDate::from_ymd_opt(2025, 3, 12)
        );
    }

    #[test]
    fn test_degenerate_model() {
        let model = CompletionModel::new(6.0, 0.0);
        assert_eq!(model.cumulative(5.9), 0.0);
        assert_eq!(model.cumulative(6.0), 1.0);
        let intervals = model.time_intervals();
        // Only the bin containing the mean has mass
        assert_eq!(intervals[10].probability, 1.0);
        assert_eq!(intervals[9].probability, 0.0);
        assert!(intervals.iter().all(|i| !i.probability.is_nan()));
    }

    proptest! {
        #[test]
        fn prop_cdf_antisymmetric(z in -8.0f64..8.0) {
            prop_assert!((normal_cdf(-z) - (1.0 - normal_cdf(z))).abs() < 1e-6);
        }

        #[test]
        fn prop_cdf_monotone(a in -8.0f64..8.0, b in -8.0f64..8.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(normal_cdf(lo) <= normal_cdf(hi));
        }

        #[test]
        fn prop_cdf_in_unit_range(z in -50.0f64..50.0) {
            let p = normal_cdf(z);
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
