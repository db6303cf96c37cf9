use super::config::FactoryConfig;
use super::cost::CostAccrualProcess;
use super::machine::MachineProcess;
use super::report::RunReport;
use super::variates::{SeededVariates, VariateSource};
use super::Workshop;
use crate::core::error::SimError;
use crate::core::simulation_engine::{SimulationEngine, SimulationObserver};
use crate::core::types::{PoolId, SimTime, StoreId};
use log::info;

/// One fully wired repair-shop simulation, ready to run
pub struct Scenario {
    config: FactoryConfig,
    engine: SimulationEngine<Workshop>,
    technicians: PoolId,
    spares: StoreId,
}

impl Scenario {
    /// Validate `config` and wire a scenario with seeded variates
    pub fn build(config: &FactoryConfig) -> Result<Self, SimError> {
        config.validate()?;
        let variates = SeededVariates::new(
            config.seed,
            &config.failure_interval,
            &config.repair_duration,
        )?;
        Self::with_variates(config, Box::new(variates))
    }

    /// Wire a scenario around a caller-supplied variate source
    pub fn with_variates(
        config: &FactoryConfig,
        variates: Box<dyn VariateSource>,
    ) -> Result<Self, SimError> {
        config.validate()?;

        let workshop = Workshop::new(variates, config.rates.clone());
        let mut engine = SimulationEngine::new(workshop);
        let technicians = engine.add_pool("technicians", config.technicians)?;
        let spares = engine.add_store("spares", config.spares_capacity, config.initial_spares)?;

        engine.spawn(Box::new(CostAccrualProcess::new(
            technicians,
            spares,
            config.accrual_period,
        )))?;
        for index in 0..config.machine_count {
            engine.spawn(Box::new(MachineProcess::new(index, technicians, spares)))?;
        }

        Ok(Self {
            config: config.clone(),
            engine,
            technicians,
            spares,
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.engine.add_observer(observer);
    }

    pub fn engine(&self) -> &SimulationEngine<Workshop> {
        &self.engine
    }

    /// Run to the configured horizon and collect the report
    pub fn run(mut self) -> Result<RunReport, SimError> {
        info!(
            "running {} machines, {} technicians, {}/{} spares until t={}",
            self.config.machine_count,
            self.config.technicians,
            self.config.initial_spares,
            self.config.spares_capacity,
            self.config.horizon
        );

        let outcome = self.engine.run(SimTime(self.config.horizon))?;

        let technicians = self.engine.pool(self.technicians)?.clone();
        let spares = self.engine.store(self.spares)?.clone();
        let events_processed = self.engine.events_processed();
        let (workshop, records) = self.engine.into_parts();

        let report = RunReport::new(
            &self.config,
            outcome,
            &workshop.costs,
            &technicians,
            &spares,
            events_processed,
            records,
        );
        info!("total cost {:.2} at t={}", report.total_cost, report.horizon);
        Ok(report)
    }
}

/// Build and run the scenario described by `config`
pub fn run_scenario(config: &FactoryConfig) -> Result<RunReport, SimError> {
    Scenario::build(config)?.run()
}
