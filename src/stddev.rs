//! Sample standard deviation over numbers read line by line from stdin,
//! computed through the crate's numeric primitives.

use std::io::{self, BufRead};
use std::process::exit;

use recalc::numeric;
use recalc::CalcError;

fn average(numbers: &[f64]) -> Result<f64, CalcError> {
    let sum = numeric::add(numbers)?;
    numeric::multiply(&[numeric::divide(&[1.0, numbers.len() as f64])?, sum])
}

/// s = sqrt((sum of squares - n * average^2) / (n - 1))
fn deviation(numbers: &[f64]) -> Result<f64, CalcError> {
    let n = numbers.len() as f64;
    let avg = average(numbers)?;
    let mut sum = numeric::multiply(&[-n, numeric::power(avg, 2.0)?])?;
    for number in numbers {
        sum = numeric::add(&[sum, numeric::power(*number, 2.0)?])?;
    }
    let variance = numeric::multiply(&[
        numeric::divide(&[1.0, numeric::subtract(&[n, 1.0])?])?,
        sum,
    ])?;
    numeric::root(variance, 2.0)
}

fn run() -> Result<f64, String> {
    let stdin = io::stdin();
    let mut numbers = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| e.to_string())?;
        if line.trim().is_empty() {
            continue;
        }
        let number: f64 = line
            .trim()
            .parse()
            .map_err(|_| format!("value {} is not valid", line.trim()))?;
        numbers.push(number);
    }
    deviation(&numbers).map_err(|e| e.to_string())
}

fn main() {
    let code = match run() {
        Ok(s) => {
            println!("{}", s);
            0
        }
        Err(e) => {
            eprintln!("stddev: {}", e);
            1
        }
    };
    exit(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_deviation() {
        let numbers = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let s = deviation(&numbers).unwrap();
        assert!((s - 2.1380899352993947).abs() < 1e-9);
    }

    #[test]
    fn average_of_values() {
        assert_eq!(average(&[1.0, 2.0, 3.0, 4.0]), Ok(2.5));
    }
}
