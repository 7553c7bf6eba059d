//! SI quantities at the public boundary.
//!
//! Geometry and boundary conditions enter as typed `uom` quantities; the
//! solver loops read `.value`, which `uom` keeps in base SI units.

use uom::si::area::square_meter;
use uom::si::length::meter;
use uom::si::mass_rate::kilogram_per_second;
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;

pub use uom::si::f64::{Area, Length, MassRate, Pressure};

/// Absolute (thermodynamic) temperature.
pub type Temperature = uom::si::f64::ThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn kgps(v: f64) -> MassRate {
    MassRate::new::<kilogram_per_second>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    Length::new::<meter>(v)
}

#[inline]
pub fn m2(v: f64) -> Area {
    Area::new::<square_meter>(v)
}

pub mod constants {
    /// Universal gas constant in J/(kmol·K).
    pub const R_UNIVERSAL: f64 = 8_314.462_618_153_24;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_store_base_si() {
        assert_eq!(pa(101_325.0).value, 101_325.0);
        assert_eq!(k(300.0).value, 300.0);
        assert_eq!(kgps(1e-2).value, 1e-2);
        assert_eq!(m(2.0).value, 2.0);
        assert_eq!(m2(7.2548e-3).value, 7.2548e-3);
    }

    #[test]
    fn derived_quantities_keep_si() {
        let perimeter = m(0.4);
        let area = perimeter * m(0.025);
        assert!((area.value - 0.01).abs() < 1e-15);
    }
}
