/// Body mass index from height in metres and weight in kilograms, rounded to
/// two decimals. `None` when either input is not a number, the height is zero,
/// or the result is not finite.
pub fn calculate_bmi(height_m: f64, weight_kg: f64) -> Option<f64> {
    if height_m.is_nan() || weight_kg.is_nan() || height_m == 0.0 {
        return None;
    }

    let bmi = weight_kg / (height_m * height_m);
    if !bmi.is_finite() {
        return None;
    }
    Some((bmi * 100.0).round() / 100.0)
}
