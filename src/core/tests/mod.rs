
use crate::core::error::SimError;
use crate::core::process::{Process, ProcessContext, Suspend};
use crate::core::types::{EntityId, PoolId, StoreId};
use std::collections::VecDeque;

/// (time, label) marks written by scripted processes
pub(crate) type Marks = Vec<(f64, String)>;

/// One instruction of a scripted test process
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Wait(f64),
    Acquire(PoolId),
    Release(PoolId),
    Get(StoreId, u64),
    Put(StoreId, u64),
    Mark(&'static str),
    Spawn(&'static str, Vec<Step>),
}

/// Process that executes a fixed list of steps, then terminates
pub(crate) struct Scripted {
    entity: EntityId,
    steps: VecDeque<Step>,
}

impl Scripted {
    pub(crate) fn new(name: &str, steps: Vec<Step>) -> Box<Self> {
        Box::new(Self {
            entity: EntityId::new(name),
            steps: steps.into(),
        })
    }
}

impl Process<Marks> for Scripted {
    fn entity(&self) -> &EntityId {
        &self.entity
    }

    fn resume(&mut self, ctx: &mut ProcessContext<'_, Marks>) -> Result<Suspend, SimError> {
        while let Some(step) = self.steps.pop_front() {
            match step {
                Step::Wait(delay) => return Ok(Suspend::Timeout(delay)),
                Step::Acquire(pool) => return Ok(Suspend::Acquire(pool)),
                Step::Get(store, amount) => return Ok(Suspend::Get { store, amount }),
                Step::Release(pool) => ctx.release(pool)?,
                Step::Put(store, amount) => ctx.put(store, amount)?,
                Step::Mark(label) => {
                    let now = ctx.now().as_f64();
                    ctx.state_mut()
                        .push((now, format!("{}:{}", self.entity, label)));
                }
                Step::Spawn(name, steps) => {
                    ctx.spawn(Scripted::new(name, steps))?;
                }
            }
        }
        Ok(Suspend::Terminate)
    }
}

pub(crate) fn labels(marks: &Marks) -> Vec<&str> {
    marks.iter().map(|(_, label)| label.as_str()).collect()
}
