/// Reducing-balance EMI for a principal repaid over `term_months` at the
/// given annual percentage rate. Falls back to straight division when the
/// rate is zero, where the closed form is undefined.
pub fn monthly_installment(principal: f64, annual_rate_percent: f64, term_months: u32) -> f64 {
    let n = term_months as f64;
    let r = annual_rate_percent / 12.0 / 100.0;

    if r == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + r).powf(n);
    principal * r * growth / (growth - 1.0)
}

/// Interest paid over the full term. Floored at zero to guard against
/// floating-point underflow at vanishingly small rates.
pub fn total_interest(installment: f64, principal: f64, term_months: u32) -> f64 {
    (installment * term_months as f64 - principal).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_divides_principal_evenly() {
        let emi = monthly_installment(120_000.0, 0.0, 12);
        assert_eq!(emi, 10_000.0);
        assert_eq!(total_interest(emi, 120_000.0, 12), 0.0);
    }

    #[test]
    fn installment_covers_principal_plus_interest() {
        let emi = monthly_installment(500_000.0, 8.5, 36);
        assert!(emi * 36.0 > 500_000.0);

        let interest = total_interest(emi, 500_000.0, 36);
        assert!((emi * 36.0 - 500_000.0 - interest).abs() < 1e-6);
    }

    #[test]
    fn matches_reference_schedule() {
        // 5 lakh over 36 months at 8.5% annual reduces to roughly 15.78k/month.
        let emi = monthly_installment(500_000.0, 8.5, 36);
        assert!(emi > 15_780.0 && emi < 15_790.0, "emi was {emi}");

        let interest = total_interest(emi, 500_000.0, 36);
        assert!(interest > 68_000.0 && interest < 68_500.0, "interest was {interest}");
    }

    #[test]
    fn tiny_rate_never_reports_negative_interest() {
        let emi = monthly_installment(1_000.0, 1e-9, 12);
        assert!(total_interest(emi, 1_000.0, 12) >= 0.0);
    }
}
