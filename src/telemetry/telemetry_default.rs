// This file is part of run_pasd_bus.
//
// Developed for the Vera Rubin Observatory Systems.
// This product includes software developed by the LSST Project
// (https://www.lsst.org).
// See the COPYRIGHT file at the top-level directory of this distribution
// for details of code ownership.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use serde_json::Value;

pub trait TelemetryDefault {
    /// Round a vector to a specific digit.
    ///
    /// # Arguments
    /// * `vector` - The vector to be rounded.
    /// * `digit` - The number of digits after the decimal point.
    ///
    /// # Returns
    /// The rounded vector.
    fn round_vector(&self, vector: &[f64], digit: i32) -> Vec<f64> {
        vector
            .iter()
            .map(|value| self.round(*value, digit))
            .collect()
    }

    /// Round a value to a specific digit.
    ///
    /// # Arguments
    /// * `value` - The value to be rounded.
    /// * `digit` - The number of digits after the decimal point.
    ///
    /// # Returns
    /// The rounded value.
    fn round(&self, value: f64, digit: i32) -> f64 {
        let normalized = 10.0_f64.powi(digit);
        (value * normalized).round() / normalized
    }

    /// Get the telemetry messages.
    ///
    /// # Arguments
    /// * `digit` - The number of digits after the decimal point.
    ///
    /// # Returns
    /// The messages.
    fn get_messages(&self, digit: i32) -> Vec<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TelemetryTest;
    impl TelemetryDefault for TelemetryTest {
        fn get_messages(&self, _digit: i32) -> Vec<Value> {
            Vec::new()
        }
    }

    #[test]
    fn test_round_vector() {
        let telemetry = TelemetryTest;

        let vector = vec![1.23456, 2.34567, 3.45678];

        assert_eq!(telemetry.round_vector(&vector, 1), vec![1.2, 2.3, 3.5]);
        assert_eq!(telemetry.round_vector(&vector[0..2], 3), vec![1.235, 2.346]);
    }

    #[test]
    fn test_round() {
        let telemetry = TelemetryTest;

        assert_eq!(telemetry.round(1.23456, 0), 1.0);
        assert_eq!(telemetry.round(1.23456, 2), 1.23);
        assert_eq!(telemetry.round(48.06, 1), 48.1);
    }
}
