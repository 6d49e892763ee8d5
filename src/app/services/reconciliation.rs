//! Utilization component reconciliation
//!
//! Brings the basal area, trees per hectare and quadratic mean diameter of the
//! four diameter bands back in line with the stand totals held in the ALL slot.
//! After reconciliation the band basal areas and densities sum to ALL and every
//! band's diameter lies within that band's bounds.
//!
//! ## Architecture
//!
//! - Mode 1 - too few trees for the band basal areas: diameters drop to the
//!   lower bounds and basal area moves down from the larger bands
//! - Mode 2 - diameters are scaled together, clamping the worst offender each
//!   round, until every band is within bounds
//! - Mode 3 - everything is put in the single band that holds the stand diameter

use crate::app::models::{
    UTIL_CLASSES, UtilizationClass, UtilizationVector, quad_mean_diameter, trees_per_hectare,
};
use crate::constants::{
    BA_SUM_TOLERANCE, MIN_RECONCILE_DQ, MODE_2_CHECK_TOLERANCE, MODE_2_MAX_ITERATIONS,
    MODE_3_DQ_OFFSET, RECONCILE_VERIFY_TOLERANCE,
};
use crate::{Error, Result};
use tracing::debug;

/// Bands Mode 1 takes basal area from, largest first
const MODE_1_SOURCE_CLASSES: [UtilizationClass; 3] = [
    UtilizationClass::Over225,
    UtilizationClass::U175To225,
    UtilizationClass::U125To175,
];

/// Reconcile the band values of a layer with its ALL values
///
/// A stand with no basal area has every band cleared. Otherwise the band basal
/// areas must already sum to ALL, and the stand diameter must be at least
/// 7.5 cm.
pub fn reconcile_components(
    basal_area: &mut UtilizationVector,
    trees_per_hectare_util: &mut UtilizationVector,
    quad_mean_diameter_util: &mut UtilizationVector,
) -> Result<()> {
    let ba_all = basal_area[UtilizationClass::All];
    if ba_all == 0.0 {
        for uc in UTIL_CLASSES {
            basal_area[uc] = 0.0;
            trees_per_hectare_util[uc] = 0.0;
            quad_mean_diameter_util[uc] = 0.0;
        }
        return Ok(());
    }

    let ba_sum = basal_area.sum_of_bands();
    if (ba_sum - ba_all).abs() > BA_SUM_TOLERANCE * ba_sum {
        return Err(Error::reconciliation(format!(
            "Computed base areas for {}+ components do not sum to expected total",
            UtilizationClass::U75To125.low_bound()
        )));
    }

    let dq_all = quad_mean_diameter(ba_all, trees_per_hectare_util[UtilizationClass::All]);
    if dq_all < MIN_RECONCILE_DQ {
        return Err(Error::reconciliation(format!(
            "Quadratic mean diameter computed from total base area and trees per hectare is less than {} cm",
            MIN_RECONCILE_DQ
        )));
    }

    let tph_high: f32 = UTIL_CLASSES
        .iter()
        .map(|uc| trees_per_hectare(basal_area[*uc], uc.low_bound()))
        .sum();

    if tph_high < trees_per_hectare_util[UtilizationClass::All] {
        debug!("Reconciling components with mode 1");
        reconcile_mode_1(basal_area, trees_per_hectare_util, quad_mean_diameter_util, tph_high);
        Ok(())
    } else if needs_mode_2(basal_area, trees_per_hectare_util, quad_mean_diameter_util) {
        debug!("Reconciling components with mode 2");
        reconcile_mode_2(basal_area, trees_per_hectare_util, quad_mean_diameter_util)
    } else {
        debug!("Components already reconciled");
        Ok(())
    }
}

/// Set every diameter to its lower bound and move basal area down until the
/// density of the stand is reached
pub fn reconcile_mode_1(
    basal_area: &mut UtilizationVector,
    trees_per_hectare_util: &mut UtilizationVector,
    quad_mean_diameter_util: &mut UtilizationVector,
    tph_high: f32,
) {
    let mut tph_need = trees_per_hectare_util[UtilizationClass::All] - tph_high;

    for uc in UTIL_CLASSES {
        quad_mean_diameter_util[uc] = uc.low_bound();
    }

    for uc in MODE_1_SOURCE_CLASSES {
        let Some(lower) = uc.previous() else {
            continue;
        };
        let ba = basal_area[uc];
        let tph_available = trees_per_hectare(ba, lower.low_bound()) - trees_per_hectare(ba, uc.low_bound());

        if tph_available < tph_need {
            basal_area[lower] += ba;
            basal_area[uc] = 0.0;
            tph_need -= tph_available;
        } else {
            let ba_move = ba * tph_need / tph_available;
            basal_area[lower] += ba_move;
            basal_area[uc] -= ba_move;
            break;
        }
    }

    for uc in UTIL_CLASSES {
        trees_per_hectare_util[uc] = trees_per_hectare(basal_area[uc], quad_mean_diameter_util[uc]);
    }
}

/// Whether the bands are far enough from the totals to need Mode 2
///
/// With matching densities, the first band with basal area that is already
/// consistent ends the check. Bands with basal area but no trees force Mode 2,
/// and inconsistent bands are passed over.
fn needs_mode_2(
    basal_area: &UtilizationVector,
    trees_per_hectare_util: &UtilizationVector,
    quad_mean_diameter_util: &UtilizationVector,
) -> bool {
    let tph_sum = trees_per_hectare_util.sum_of_bands();
    if (tph_sum - trees_per_hectare_util[UtilizationClass::All]).abs() / tph_sum > MODE_2_CHECK_TOLERANCE {
        return true;
    }

    for uc in UTIL_CLASSES {
        if basal_area[uc] <= 0.0 {
            continue;
        }
        let tph = trees_per_hectare_util[uc];
        if tph <= 0.0 {
            return true;
        }
        let dq_want = quad_mean_diameter(basal_area[uc], tph);
        let dq = quad_mean_diameter_util[uc];
        let in_bounds = dq >= uc.low_bound() && dq <= uc.high_bound();
        if in_bounds && (dq_want - dq).abs() < MODE_2_CHECK_TOLERANCE {
            return false;
        }
    }
    false
}

/// Scale band diameters until every band is within bounds, then recompute densities
pub fn reconcile_mode_2(
    basal_area: &mut UtilizationVector,
    trees_per_hectare_util: &mut UtilizationVector,
    quad_mean_diameter_util: &mut UtilizationVector,
) -> Result<()> {
    let mut ba_fixed = 0.0f32;
    let mut tph_fixed = 0.0f32;
    let mut limited = [false; 4];
    let mut dq_trial = UtilizationVector::new();
    let band = |uc: UtilizationClass| (uc.index() - 1) as usize;

    let mut iteration = 0;
    loop {
        iteration += 1;
        if iteration > MODE_2_MAX_ITERATIONS {
            return Err(Error::reconciliation(format!(
                "Mode 2 component reconciliation iterations exceeded {}",
                MODE_2_MAX_ITERATIONS
            )));
        }

        let sum: f32 = UTIL_CLASSES
            .iter()
            .filter(|uc| basal_area[**uc] != 0.0 && !limited[band(**uc)])
            .map(|uc| basal_area[*uc] / (quad_mean_diameter_util[*uc] * quad_mean_diameter_util[*uc]))
            .sum();

        let ba_all = basal_area[UtilizationClass::All] - ba_fixed;
        let tph_all = trees_per_hectare_util[UtilizationClass::All] - tph_fixed;
        if ba_all <= 0.0 || tph_all <= 0.0 {
            debug!("No basal area left after {} rounds, falling back to mode 3", iteration);
            return reconcile_mode_3(basal_area, trees_per_hectare_util, quad_mean_diameter_util);
        }

        let dq_all = quad_mean_diameter(ba_all, tph_all);
        let scale = (dq_all * dq_all / ba_all * sum).sqrt();

        for uc in UTIL_CLASSES {
            if !limited[band(uc)] && basal_area[uc] > 0.0 {
                dq_trial[uc] = quad_mean_diameter_util[uc] * scale;
            }
        }

        // Worst offender as (class, clamp to low bound)
        let mut worst: Option<(UtilizationClass, bool)> = None;
        let mut violation = 0.0f32;
        for uc in UTIL_CLASSES {
            if basal_area[uc] > 0.0 && dq_trial[uc] < uc.low_bound() {
                let amount = 1.0 - dq_trial[uc] / uc.low_bound();
                if amount > violation {
                    violation = amount;
                    worst = Some((uc, true));
                }
            }
            if dq_trial[uc] > uc.high_bound() {
                let amount = dq_trial[uc] / uc.high_bound() - 1.0;
                if amount > violation {
                    violation = amount;
                    worst = Some((uc, false));
                }
            }
        }

        let Some((uc, low)) = worst else {
            break;
        };
        dq_trial[uc] = if low { uc.low_bound() } else { uc.high_bound() };
        limited[band(uc)] = true;
        ba_fixed += basal_area[uc];
        tph_fixed += trees_per_hectare(basal_area[uc], dq_trial[uc]);
    }

    for uc in UTIL_CLASSES {
        quad_mean_diameter_util[uc] = dq_trial[uc];
        trees_per_hectare_util[uc] = trees_per_hectare(basal_area[uc], dq_trial[uc]);
    }

    let ba_sum = basal_area.sum_of_bands();
    if (ba_sum - basal_area[UtilizationClass::All]).abs() > RECONCILE_VERIFY_TOLERANCE * ba_sum {
        return Err(Error::reconciliation("Failed to reconcile Base Area"));
    }
    let tph_sum = trees_per_hectare_util.sum_of_bands();
    if (tph_sum - trees_per_hectare_util[UtilizationClass::All]).abs() > RECONCILE_VERIFY_TOLERANCE * tph_sum {
        return Err(Error::reconciliation("Failed to reconcile Trees per Hectare"));
    }
    Ok(())
}

/// Move the whole stand into the band that holds its diameter
///
/// The band takes the stand diameter clamped to its bounds. A stand diameter
/// no band can hold is an error.
pub fn reconcile_mode_3(
    basal_area: &mut UtilizationVector,
    trees_per_hectare_util: &mut UtilizationVector,
    quad_mean_diameter_util: &mut UtilizationVector,
) -> Result<()> {
    for uc in UTIL_CLASSES {
        basal_area[uc] = 0.0;
        trees_per_hectare_util[uc] = 0.0;
        quad_mean_diameter_util[uc] = uc.low_bound() + MODE_3_DQ_OFFSET;
    }

    let dq_all = quad_mean_diameter_util[UtilizationClass::All];
    let target = UTIL_CLASSES
        .into_iter()
        .find(|uc| dq_all < uc.high_bound())
        .ok_or_else(|| {
            Error::reconciliation(format!(
                "Quadratic mean diameter {} does not fit any utilization class",
                dq_all
            ))
        })?;

    basal_area[target] = basal_area[UtilizationClass::All];
    trees_per_hectare_util[target] = trees_per_hectare_util[UtilizationClass::All];
    quad_mean_diameter_util[target] = dq_all.max(target.low_bound());

    for uc in UTIL_CLASSES {
        let dq = quad_mean_diameter_util[uc];
        if !(dq >= uc.low_bound() && dq < uc.high_bound()) {
            return Err(Error::reconciliation(format!(
                "Quadratic mean diameter {} of class {} is outside [{}, {})",
                dq,
                uc,
                uc.low_bound(),
                uc.high_bound()
            )));
        }
    }
    Ok(())
}
