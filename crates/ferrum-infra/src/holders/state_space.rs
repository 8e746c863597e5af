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

use ferrum_core::twin::{HolderInput, HolderOutput, Simulatable, TwinError};
use ferrum_core::GasKind;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Matrices and initial state of a holder model.
///
/// Matrices are written row by row in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSpaceParams {
    /// System matrix, `n x n`.
    #[serde(with = "rows")]
    pub a: Array2<f64>,
    /// Input matrix, `n x m`.
    #[serde(with = "rows")]
    pub b: Array2<f64>,
    /// Output matrix, `p x n`.
    #[serde(with = "rows")]
    pub c: Array2<f64>,
    /// Feedthrough matrix, `p x m`.
    #[serde(with = "rows")]
    pub d: Array2<f64>,
    /// Initial state, length `n`.
    #[serde(with = "vector")]
    pub x0: Array1<f64>,
}

impl StateSpaceParams {
    /// A single-state, single-input, single-output system with no feedthrough.
    pub fn scalar(a: f64, b: f64, c: f64, x0: f64) -> Self {
        Self {
            a: Array2::from_elem((1, 1), a),
            b: Array2::from_elem((1, 1), b),
            c: Array2::from_elem((1, 1), c),
            d: Array2::zeros((1, 1)),
            x0: Array1::from_elem(1, x0),
        }
    }

    /// Identified model of the BFG holder.
    pub fn bfg() -> Self {
        Self::scalar(0.994, 3.135e-6, 3.49416e6, 0.004)
    }

    /// Identified model of the BOFG holder.
    pub fn bofg() -> Self {
        Self::scalar(0.999, 7.2884e-6, 3.2121e6, 0.0049)
    }

    /// Identified model of the COG holder.
    pub fn cog() -> Self {
        Self::scalar(1.0, 1.7187e-6, 1.0066e6, 0.0045)
    }

    /// The preset for `gas`.
    pub fn preset(gas: GasKind) -> Self {
        match gas {
            GasKind::Bfg => Self::bfg(),
            GasKind::Bofg => Self::bofg(),
            GasKind::Cog => Self::cog(),
        }
    }

    /// Returns `(n, m, p)` after checking every matrix agrees with `A`, `B` and `C`.
    pub fn dimensions(&self) -> Result<(usize, usize, usize), TwinError> {
        let (n, a_cols) = self.a.dim();
        check_len(a_cols, n)?;
        let (b_rows, m) = self.b.dim();
        check_len(b_rows, n)?;
        let (p, c_cols) = self.c.dim();
        check_len(c_cols, n)?;
        let (d_rows, d_cols) = self.d.dim();
        check_len(d_rows, p)?;
        check_len(d_cols, m)?;
        check_len(self.x0.len(), n)?;
        Ok((n, m, p))
    }
}

fn check_len(found: usize, expected: usize) -> Result<(), TwinError> {
    if found == expected {
        Ok(())
    } else {
        Err(TwinError::DimensionMismatch { expected, found })
    }
}

fn all_finite(v: &Array1<f64>) -> bool {
    v.iter().all(|x| x.is_finite())
}

/// Row-list form of a matrix.
mod rows {
    use ndarray::Array2;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(matrix: &Array2<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<Vec<f64>> = matrix.rows().into_iter().map(|r| r.to_vec()).collect();
        rows.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Array2<f64>, D::Error> {
        let rows = Vec::<Vec<f64>>::deserialize(deserializer)?;
        let cols = rows.first().map_or(0, Vec::len);
        let shape = (rows.len(), cols);
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Array2::from_shape_vec(shape, flat).map_err(D::Error::custom)
    }
}

/// Plain list form of a vector.
mod vector {
    use ndarray::Array1;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Array1<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        v.to_vec().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Array1<f64>, D::Error> {
        Vec::<f64>::deserialize(deserializer).map(Array1::from)
    }
}

/// A discrete linear holder model.
#[derive(Debug, Clone)]
pub struct StateSpaceHolder {
    params: StateSpaceParams,
    x: Array1<f64>,
    inputs: usize,
}

impl StateSpaceHolder {
    /// Builds a model, rejecting inconsistent matrix sizes.
    pub fn new(params: StateSpaceParams) -> Result<Self, TwinError> {
        let (states, inputs, outputs) = params.dimensions()?;
        log::debug!(
            "StateSpaceHolder: {} states, {} inputs, {} outputs",
            states,
            inputs,
            outputs
        );
        Ok(Self {
            x: params.x0.clone(),
            params,
            inputs,
        })
    }

    /// The preset model for `gas`.
    pub fn for_gas(gas: GasKind) -> Self {
        let params = StateSpaceParams::preset(gas);
        let inputs = params.b.ncols();
        Self {
            x: params.x0.clone(),
            params,
            inputs,
        }
    }

    /// Current state vector.
    pub fn state(&self) -> &Array1<f64> {
        &self.x
    }

    /// Advances one step and returns the output vector.
    ///
    /// The state only moves when both the output and the next state are
    /// finite.
    pub fn step_vector(&mut self, u: &[f64]) -> Result<Array1<f64>, TwinError> {
        check_len(u.len(), self.inputs)?;
        let u = ArrayView1::from(u);
        let p = &self.params;

        let y = p.c.dot(&self.x) + p.d.dot(&u);
        let next = p.a.dot(&self.x) + p.b.dot(&u);

        if !all_finite(&y) {
            return Err(TwinError::NonFinite("level".to_string()));
        }
        if !all_finite(&next) {
            return Err(TwinError::NonFinite("state".to_string()));
        }
        self.x = next;
        Ok(y)
    }
}

impl Simulatable for StateSpaceHolder {
    type Input = HolderInput;
    type Output = HolderOutput;

    fn step(&mut self, input: &HolderInput) -> Result<HolderOutput, TwinError> {
        let y = self.step_vector(&[input.gas_net_flow])?;
        let level = y
            .get(0)
            .copied()
            .ok_or(TwinError::DimensionMismatch {
                expected: 1,
                found: 0,
            })?;
        Ok(HolderOutput { level })
    }

    /// Returns to the initial state `x0`.
    fn reset(&mut self) {
        self.x = self.params.x0.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_presets_are_well_formed() {
        for gas in GasKind::ALL {
            assert_eq!(StateSpaceParams::preset(gas).dimensions(), Ok((1, 1, 1)));
        }
    }

    #[test]
    fn test_output_uses_state_before_update() {
        let mut holder = StateSpaceHolder::for_gas(GasKind::Bfg);
        let first = holder.step(&HolderInput { gas_net_flow: 1000.0 }).unwrap();
        assert_relative_eq!(first.level, 3.49416e6 * 0.004, epsilon = 1e-6);
        assert_relative_eq!(holder.state()[0], 0.994 * 0.004 + 3.135e-6 * 1000.0, epsilon = 1e-12);

        let second = holder.step(&HolderInput { gas_net_flow: 0.0 }).unwrap();
        assert_relative_eq!(
            second.level,
            3.49416e6 * (0.994 * 0.004 + 3.135e-3),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_cog_integrates_net_flow() {
        let mut holder = StateSpaceHolder::for_gas(GasKind::Cog);
        for _ in 0..3 {
            holder.step(&HolderInput { gas_net_flow: 100.0 }).unwrap();
        }
        assert_relative_eq!(holder.state()[0], 0.0045 + 3.0 * 1.7187e-4, epsilon = 1e-12);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut holder = StateSpaceHolder::for_gas(GasKind::Bofg);
        holder.step(&HolderInput { gas_net_flow: 5000.0 }).unwrap();
        holder.reset();
        assert_eq!(holder.state(), &arr1(&[0.0049]));
    }

    #[test]
    fn test_mismatched_matrices_are_rejected() {
        let mut params = StateSpaceParams::bfg();
        params.c = arr2(&[[1.0, 2.0]]);
        assert_eq!(
            StateSpaceHolder::new(params).unwrap_err(),
            TwinError::DimensionMismatch {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_two_state_model() {
        let params = StateSpaceParams {
            a: arr2(&[[1.0, 0.0], [0.0, 0.5]]),
            b: arr2(&[[1.0], [1.0]]),
            c: arr2(&[[1.0, 1.0]]),
            d: arr2(&[[0.0]]),
            x0: arr1(&[0.0, 2.0]),
        };
        let mut holder = StateSpaceHolder::new(params).unwrap();
        assert_eq!(holder.step_vector(&[1.0]).unwrap(), arr1(&[2.0]));
        assert_eq!(holder.state(), &arr1(&[1.0, 2.0]));
        assert!(holder.step_vector(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_non_finite_output_is_an_error() {
        let mut holder = StateSpaceHolder::for_gas(GasKind::Bfg);
        assert_eq!(
            holder
                .step(&HolderInput {
                    gas_net_flow: f64::NAN
                })
                .unwrap_err(),
            TwinError::NonFinite("level".to_string())
        );
    }

    #[test]
    fn test_non_finite_input_leaves_state_untouched() {
        let mut holder = StateSpaceHolder::for_gas(GasKind::Bfg);
        assert!(holder.step(&HolderInput { gas_net_flow: f64::NAN }).is_err());
        assert_eq!(holder.state(), &arr1(&[0.004]));

        let next = holder.step(&HolderInput { gas_net_flow: 1000.0 }).unwrap();
        assert_relative_eq!(next.level, 3.49416e6 * 0.004, epsilon = 1e-6);
    }

    #[test]
    fn test_ragged_rows_fail_to_parse() {
        let parsed: Result<StateSpaceParams, _> = serde_json::from_str(
            r#"{"a": [[1.0, 0.0], [1.0]], "b": [[1.0]], "c": [[1.0]], "d": [[0.0]], "x0": [0.0]}"#,
        );
        assert!(parsed.is_err());

        let params = StateSpaceParams::cog();
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains(r#""a":[[1.0]]"#));
    }
}
