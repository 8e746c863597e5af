// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The process-twin contract.
//!
//! A twin turns setpoints into physical outputs. The control loop depends
//! only on [`Simulatable`]; concrete twins and holder models live in
//! `ferrum-infra` or are supplied by the host application.
//!
//! Many existing plant models speak flat labelled records
//! (`"wind_volume [Nm³/min]" -> 4000.0`). Those plug in through
//! [`RecordModel`] and the [`RecordTwin`] adapter, which converts the typed
//! records of [`data`] on the way in and out.

pub mod data;

pub use data::*;

use std::collections::BTreeMap;
use std::marker::PhantomData;
use thiserror::Error;

/// A flat record of labelled values, the wire shape of record-speaking twins.
pub type TwinRecord = BTreeMap<String, f64>;

/// Errors a twin or holder model can report.
///
/// The orchestrator never propagates these: it logs them and keeps the
/// previous observation, or falls back to the state of charge for holder
/// levels.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TwinError {
    /// The model produced NaN or an infinity.
    #[error("model produced a non-finite value for '{0}'")]
    NonFinite(String),
    /// Matrix or vector sizes do not line up.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected size.
        expected: usize,
        /// Size found.
        found: usize,
    },
    /// The model cannot run.
    #[error("model unavailable: {0}")]
    Unavailable(String),
}

/// A stepwise model mapping a typed input to a typed output.
pub trait Simulatable: Send {
    /// The input record.
    type Input;
    /// The output record.
    type Output;

    /// Advances the model by one call.
    fn step(&mut self, input: &Self::Input) -> Result<Self::Output, TwinError>;

    /// Restores the model's initial internal state. Stateless models keep the default no-op.
    fn reset(&mut self) {}
}

/// A blast-furnace twin.
pub type FurnaceTwin = Box<dyn Simulatable<Input = FurnaceTwinInput, Output = FurnaceTwinOutput>>;
/// A converter twin.
pub type ConverterTwin =
    Box<dyn Simulatable<Input = ConverterTwinInput, Output = ConverterTwinOutput>>;
/// A coke-oven twin.
pub type CokeOvenTwin = Box<dyn Simulatable<Input = CokeOvenTwinInput, Output = CokeOvenTwinOutput>>;
/// A gas-holder dynamic model.
pub type HolderModel = Box<dyn Simulatable<Input = HolderInput, Output = HolderOutput>>;

/// Conversion into a labelled record.
pub trait IntoRecord {
    /// Builds the record.
    fn to_record(&self) -> TwinRecord;
}

/// Conversion from a labelled record. Missing labels take documented defaults.
pub trait FromRecord {
    /// Reads the record.
    fn from_record(record: &TwinRecord) -> Self;
}

/// A model that speaks labelled records.
pub trait RecordModel: Send {
    /// Evaluates one step.
    fn evaluate(&mut self, inputs: &TwinRecord) -> Result<TwinRecord, TwinError>;
}

impl<F> RecordModel for F
where
    F: FnMut(&TwinRecord) -> Result<TwinRecord, TwinError> + Send,
{
    fn evaluate(&mut self, inputs: &TwinRecord) -> Result<TwinRecord, TwinError> {
        self(inputs)
    }
}

/// Adapts a [`RecordModel`] to the typed [`Simulatable`] contract.
pub struct RecordTwin<M, I, O> {
    model: M,
    _io: PhantomData<fn(&I) -> O>,
}

impl<M: RecordModel, I, O> RecordTwin<M, I, O> {
    /// Wraps a record-speaking model.
    pub fn new(model: M) -> Self {
        Self {
            model,
            _io: PhantomData,
        }
    }
}

impl<M, I, O> Simulatable for RecordTwin<M, I, O>
where
    M: RecordModel,
    I: IntoRecord,
    O: FromRecord,
{
    type Input = I;
    type Output = O;

    fn step(&mut self, input: &I) -> Result<O, TwinError> {
        let outputs = self.model.evaluate(&input.to_record())?;
        if let Some((label, _)) = outputs.iter().find(|(_, v)| !v.is_finite()) {
            return Err(TwinError::NonFinite(label.clone()));
        }
        Ok(O::from_record(&outputs))
    }
}
