// ============================================================
// Layer 6 - Metrics
// ============================================================
// Slot-level precision / recall / F1 counters and the plain-text
// statistics report.
//
// Counting rules (one slot at a time):
//   predicted += 1  when the classifier proposes a filler
//   gold      += 1  when the slot has at least one correct filler
//   tp        += 1  when the proposed filler is a correct one
//
// Example report:
//   Hyper-parameters: featurizer=one_hot, fit_intercept=false, ...
//   fold  C      class_weight  val_f1  precision  recall  f1
//   0     0.1    balanced      0.5120  0.4800     0.5000  0.4898
//   ...
//   overall                            0.4710     0.4933  0.4819

use anyhow::Result;
use std::collections::BTreeMap;
use std::io::Write;

use serde::{Deserialize, Serialize};

/// Precision / recall / F1 counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prf {
    pub tp:        usize,
    pub predicted: usize,
    pub gold:      usize,
}

impl Prf {
    pub fn new(tp: usize, predicted: usize, gold: usize) -> Self {
        Self { tp, predicted, gold }
    }

    pub fn precision(&self) -> f64 {
        ratio(self.tp, self.predicted)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.tp, self.gold)
    }

    /// Harmonic mean; 0 when precision and recall are both 0
    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) }
    }

    pub fn add(&mut self, other: &Prf) {
        self.tp        += other.tp;
        self.predicted += other.predicted;
        self.gold      += other.gold;
    }
}

fn ratio(a: usize, b: usize) -> f64 {
    if b == 0 { 0.0 } else { a as f64 / b as f64 }
}

/// One row of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldRow {
    pub fold:         usize,
    pub c:            f64,
    pub class_weight: String,
    pub val:          Prf,
    pub test:         Prf,
}

/// Everything `print_stats` writes out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsReport {
    /// Header line describing the run
    pub header:  String,
    pub folds:   Vec<FoldRow>,
    pub per_arg: BTreeMap<String, Prf>,
}

impl StatsReport {
    /// Micro-averaged counts over all test folds
    pub fn overall(&self) -> Prf {
        let mut total = Prf::default();
        for row in &self.folds {
            total.add(&row.test);
        }
        total
    }

    /// Unweighted mean of per-fold test F1
    pub fn mean_fold_f1(&self) -> f64 {
        if self.folds.is_empty() {
            return 0.0;
        }
        self.folds.iter().map(|r| r.test.f1()).sum::<f64>() / self.folds.len() as f64
    }

    pub fn write_to(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", self.header)?;
        writeln!(out)?;
        writeln!(
            out,
            "{:<8}{:<8}{:<14}{:>8}{:>11}{:>9}{:>9}",
            "fold", "C", "class_weight", "val_f1", "precision", "recall", "f1"
        )?;
        for row in &self.folds {
            writeln!(
                out,
                "{:<8}{:<8}{:<14}{:>8.4}{:>11.4}{:>9.4}{:>9.4}",
                row.fold,
                row.c,
                row.class_weight,
                row.val.f1(),
                row.test.precision(),
                row.test.recall(),
                row.test.f1(),
            )?;
        }

        let overall = self.overall();
        writeln!(
            out,
            "{:<38}{:>11.4}{:>9.4}{:>9.4}",
            "overall", overall.precision(), overall.recall(), overall.f1()
        )?;
        writeln!(
            out,
            "tp={} predicted={} gold={} mean_fold_f1={:.4}",
            overall.tp, overall.predicted, overall.gold, self.mean_fold_f1()
        )?;

        if !self.per_arg.is_empty() {
            writeln!(out)?;
            writeln!(out, "{:<8}{:>11}{:>9}{:>9}{:>7}", "arg", "precision", "recall", "f1", "gold")?;
            for (arg, prf) in &self.per_arg {
                writeln!(
                    out,
                    "{:<8}{:>11.4}{:>9.4}{:>9.4}{:>7}",
                    arg, prf.precision(), prf.recall(), prf.f1(), prf.gold
                )?;
            }
        }

        Ok(())
    }
}
