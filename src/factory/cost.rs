use super::Workshop;
use crate::core::error::SimError;
use crate::core::event::EventKind;
use crate::core::process::{Process, ProcessContext, Suspend};
use crate::core::types::{EntityId, PoolId, SimTime, StoreId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostCategory {
    Labor,
    SparesHolding,
    Downtime,
}

/// Accumulated cost split by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub labor: f64,
    pub spares_holding: f64,
    pub downtime: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.labor + self.spares_holding + self.downtime
    }
}

/// Running total after a charge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSample {
    pub time: SimTime,
    pub total: f64,
}

/// Non-decreasing cost total for one run.
///
/// Only non-negative finite charges are accepted, so the total can never
/// go down.
#[derive(Debug, Clone, Default)]
pub struct CostAccumulator {
    breakdown: CostBreakdown,
    history: Vec<CostSample>,
}

impl CostAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn charge(
        &mut self,
        time: SimTime,
        category: CostCategory,
        amount: f64,
    ) -> Result<(), SimError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(SimError::InvalidCharge { amount });
        }

        match category {
            CostCategory::Labor => self.breakdown.labor += amount,
            CostCategory::SparesHolding => self.breakdown.spares_holding += amount,
            CostCategory::Downtime => self.breakdown.downtime += amount,
        }
        self.history.push(CostSample {
            time,
            total: self.breakdown.total(),
        });
        Ok(())
    }

    pub fn total(&self) -> f64 {
        self.breakdown.total()
    }

    pub fn breakdown(&self) -> CostBreakdown {
        self.breakdown
    }

    pub fn history(&self) -> &[CostSample] {
        &self.history
    }
}

/// Charges the standing cost of technician and spares capacity once per period
pub struct CostAccrualProcess {
    entity: EntityId,
    technicians: PoolId,
    spares: StoreId,
    period: f64,
}

impl CostAccrualProcess {
    pub fn new(technicians: PoolId, spares: StoreId, period: f64) -> Self {
        Self {
            entity: EntityId::new("factory"),
            technicians,
            spares,
            period,
        }
    }
}

impl Process<Workshop> for CostAccrualProcess {
    fn entity(&self) -> &EntityId {
        &self.entity
    }

    fn resume(&mut self, ctx: &mut ProcessContext<'_, Workshop>) -> Result<Suspend, SimError> {
        let technicians = ctx.pool(self.technicians)?.capacity() as f64;
        let spares = ctx.store(self.spares)?.capacity() as f64;
        let now = ctx.now();
        let period = self.period;

        let workshop = ctx.state_mut();
        let labor = workshop.rates.labor_per_technician_hour * period * technicians;
        let holding = workshop.rates.spares_holding_per_period * spares;
        workshop.costs.charge(now, CostCategory::Labor, labor)?;
        workshop.costs.charge(now, CostCategory::SparesHolding, holding)?;

        ctx.record(EventKind::CostAccrued, &self.entity);
        Ok(Suspend::Timeout(period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charges_accumulate_by_category() {
        let mut costs = CostAccumulator::new();
        costs.charge(SimTime(0.0), CostCategory::Labor, 90.0).unwrap();
        costs.charge(SimTime(0.0), CostCategory::SparesHolding, 600.0).unwrap();
        costs.charge(SimTime(3.0), CostCategory::Downtime, 40.0).unwrap();

        let breakdown = costs.breakdown();
        assert_eq!(breakdown.labor, 90.0);
        assert_eq!(breakdown.spares_holding, 600.0);
        assert_eq!(breakdown.downtime, 40.0);
        assert_eq!(costs.total(), 730.0);
        assert_eq!(costs.history().len(), 3);
        assert_eq!(costs.history()[2].total, 730.0);
    }

    #[test]
    fn test_negative_charge_rejected() {
        let mut costs = CostAccumulator::new();
        costs.charge(SimTime(0.0), CostCategory::Labor, 5.0).unwrap();
        assert_eq!(
            costs.charge(SimTime(1.0), CostCategory::Downtime, -1.0),
            Err(SimError::InvalidCharge { amount: -1.0 })
        );
        assert!(costs.charge(SimTime(1.0), CostCategory::Downtime, f64::NAN).is_err());
        assert_eq!(costs.total(), 5.0);
        assert_eq!(costs.history().len(), 1);
    }
}
