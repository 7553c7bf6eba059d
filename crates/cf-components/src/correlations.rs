//! Dimensionless-group closures used by the channel solver.
//!
//! Each correlation is a plain function so a [`Closures`] set can be copied
//! into every channel and swapped per case.

/// Reynolds number `rho u D_h / mu`.
pub type ReynoldsFn = fn(rho: f64, u: f64, d_h: f64, mu: f64) -> f64;
/// Prandtl number `cp mu / k`.
pub type PrandtlFn = fn(cp: f64, mu: f64, k: f64) -> f64;
/// Darcy friction factor from roughness, hydraulic diameter and Reynolds number.
pub type FrictionFactorFn = fn(roughness: f64, d_h: f64, re: f64) -> f64;
/// Nusselt number from Reynolds and Prandtl numbers.
pub type NusseltFn = fn(re: f64, pr: f64) -> f64;

pub fn reynolds(rho: f64, u: f64, d_h: f64, mu: f64) -> f64 {
    rho * u * d_h / mu
}

pub fn prandtl(cp: f64, mu: f64, k: f64) -> f64 {
    cp * mu / k
}

/// Churchill (1977) friction factor, valid across laminar, transitional and
/// turbulent flow.
pub fn churchill(roughness: f64, d_h: f64, re: f64) -> f64 {
    let a = (2.457 * (1.0 / ((7.0 / re).powf(0.9) + 0.27 * roughness / d_h)).ln()).powi(16);
    let b = (37_530.0 / re).powi(16);
    8.0 * ((8.0 / re).powi(12) + 1.0 / (a + b).powf(1.5)).powf(1.0 / 12.0)
}

/// Fully developed laminar flow, `64 / Re`.
pub fn laminar(_roughness: f64, _d_h: f64, re: f64) -> f64 {
    64.0 / re
}

/// Explicit Swamee-Jain approximation of Colebrook-White.
pub fn swamee_jain(roughness: f64, d_h: f64, re: f64) -> f64 {
    let ln = (roughness / (3.7 * d_h) + 5.74 / re.powf(0.9)).ln();
    1.325 / (ln * ln)
}

/// Laminar below Re 2300, Swamee-Jain above.
pub fn laminar_turbulent(roughness: f64, d_h: f64, re: f64) -> f64 {
    if re < 2300.0 {
        laminar(roughness, d_h, re)
    } else {
        swamee_jain(roughness, d_h, re)
    }
}

/// Dittus-Boelter heating correlation, `0.023 Re^0.8 Pr^0.4`.
pub fn dittus_boelter(re: f64, pr: f64) -> f64 {
    0.023 * re.powf(0.8) * pr.powf(0.4)
}

/// Gnielinski correlation with the Petukhov smooth-pipe friction factor.
pub fn gnielinski(re: f64, pr: f64) -> f64 {
    let f = (0.790 * re.ln() - 1.64).powi(-2);
    (f / 8.0) * (re - 1000.0) * pr / (1.0 + 12.7 * (f / 8.0).sqrt() * (pr.powf(2.0 / 3.0) - 1.0))
}

/// The correlation set one channel evaluates.
#[derive(Clone, Copy, Debug)]
pub struct Closures {
    pub reynolds: ReynoldsFn,
    pub prandtl: PrandtlFn,
    pub friction_factor: FrictionFactorFn,
    pub nusselt: NusseltFn,
}

impl Default for Closures {
    fn default() -> Self {
        Self {
            reynolds,
            prandtl,
            friction_factor: churchill,
            nusselt: dittus_boelter,
        }
    }
}

impl Closures {
    pub fn with_friction_factor(mut self, f: FrictionFactorFn) -> Self {
        self.friction_factor = f;
        self
    }

    pub fn with_nusselt(mut self, f: NusseltFn) -> Self {
        self.nusselt = f;
        self
    }

    /// Convective heat transfer coefficient `Nu k / D_h` at one state.
    pub fn htc(&self, rho: f64, u: f64, mu: f64, cp: f64, k: f64, d_h: f64) -> f64 {
        let re = (self.reynolds)(rho, u, d_h, mu);
        let pr = (self.prandtl)(cp, mu, k);
        (self.nusselt)(re, pr) * k / d_h
    }
}
