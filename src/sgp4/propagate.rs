/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::f64::consts::{PI, TAU};

use snafu::ensure;

use super::deep_space::{MeanState, PerturbedElements};
use super::init::TEMP4;
use super::{
    DecayedSnafu, InvalidMeanElementsSnafu, NegativeMeanMotionSnafu,
    NegativeSemiLatusRectumSnafu, PerturbedEccentricitySnafu, Regime, ResonanceState, Sgp4,
    Sgp4Error, TemeState,
};
use crate::linalg::Vector3;

const X2O3: f64 = 2.0 / 3.0;
/// Maximum number of Newton-Raphson iterations on Kepler's equation
const KEPLER_MAX_ITER: usize = 10;
const KEPLER_TOL: f64 = 1.0e-12;

impl Sgp4 {
    /// Propagates the mean elements by `minutes` from their epoch (negative to propagate backward).
    ///
    /// Returns the position and velocity in the TEME frame, or the error code of this time. A decay
    /// error is time-dependent: the same record may still be propagated to earlier times.
    pub fn propagate(&self, minutes: f64) -> Result<TemeState, Sgp4Error> {
        self.propagate_with(&mut ResonanceState::default(), minutes)
    }

    /// Propagates like [`Sgp4::propagate`], reusing the deep-space resonance integrator state from previous calls.
    pub fn propagate_with(
        &self,
        scratch: &mut ResonanceState,
        minutes: f64,
    ) -> Result<TemeState, Sgp4Error> {
        let t = minutes;
        let xke = self.grav.xke;

        // Secular gravity and atmospheric drag
        let xmdf = self.mo + self.mdot * t;
        let argpdf = self.argpo + self.argpdot * t;
        let nodedf = self.nodeo + self.nodedot * t;
        let t2 = t * t;

        let mut mean = MeanState {
            em: self.ecco,
            argpm: argpdf,
            inclm: self.inclo,
            mm: xmdf,
            nodem: nodedf + self.nodecf * t2,
            nm: self.no_unkozai,
        };
        let mut tempa = 1.0 - self.cc1 * t;
        let mut tempe = self.bstar * self.cc4 * t;
        let mut templ = self.t2cof * t2;

        match &self.regime {
            Regime::NearEarth { drag: Some(drag) } => {
                let delomg = drag.omgcof * t;
                let delmtemp = 1.0 + drag.eta * xmdf.cos();
                let delm = drag.xmcof * (delmtemp * delmtemp * delmtemp - drag.delmo);
                let temp = delomg + delm;
                mean.mm = xmdf + temp;
                mean.argpm = argpdf - temp;
                let t3 = t2 * t;
                let t4 = t3 * t;
                tempa = tempa - drag.d2 * t2 - drag.d3 * t3 - drag.d4 * t4;
                tempe += self.bstar * drag.cc5 * (mean.mm.sin() - drag.sinmao);
                templ = templ + drag.t3cof * t3 + t4 * (drag.t4cof + t * drag.t5cof);
            }
            Regime::NearEarth { drag: None } => {}
            Regime::DeepSpace(ds) => ds.secular(self, scratch, t, &mut mean),
        }

        ensure!(
            mean.nm > 0.0,
            NegativeMeanMotionSnafu {
                mean_motion_rad_min: mean.nm
            }
        );

        let am = (xke / mean.nm).powf(X2O3) * tempa * tempa;
        // Drag has shrunk the mean orbit to nothing
        ensure!(
            tempa > 0.0,
            DecayedSnafu {
                minutes: t,
                radius_er: am
            }
        );
        let nm = xke / am.powf(1.5);
        let mut em = mean.em - tempe;
        ensure!(
            (-0.001..1.0).contains(&em),
            InvalidMeanElementsSnafu {
                ecc: em,
                sma_er: am
            }
        );
        if em < 1.0e-6 {
            em = 1.0e-6;
        }

        let mm = mean.mm + self.no_unkozai * templ;
        let xlm = mm + mean.argpm + mean.nodem;
        let nodem = mean.nodem % TAU;
        let argpm = mean.argpm % TAU;
        let xlm = xlm % TAU;
        let mm = (xlm - argpm - nodem) % TAU;

        // Long-period periodics
        let mut el = PerturbedElements {
            ep: em,
            inclp: mean.inclm,
            nodep: nodem,
            argpp: argpm,
            mp: mm,
        };
        let mut aycof = self.aycof;
        let mut xlcof = self.xlcof;

        if let Regime::DeepSpace(ds) = &self.regime {
            ds.periodics(t, self.ops_mode, &mut el);
            if el.inclp < 0.0 {
                el.inclp = -el.inclp;
                el.nodep += PI;
                el.argpp -= PI;
            }
            ensure!(
                (0.0..=1.0).contains(&el.ep),
                PerturbedEccentricitySnafu { ecc: el.ep }
            );
        }

        let (sinip, cosip) = el.inclp.sin_cos();
        if self.is_deep_space() {
            aycof = -0.5 * self.grav.j3oj2 * sinip;
            xlcof = if (cosip + 1.0).abs() > 1.5e-12 {
                -0.25 * self.grav.j3oj2 * sinip * (3.0 + 5.0 * cosip) / (1.0 + cosip)
            } else {
                -0.25 * self.grav.j3oj2 * sinip * (3.0 + 5.0 * cosip) / TEMP4
            };
        }

        let axnl = el.ep * el.argpp.cos();
        let temp = 1.0 / (am * (1.0 - el.ep * el.ep));
        let aynl = el.ep * el.argpp.sin() + temp * aycof;
        let xl = el.mp + el.argpp + el.nodep + temp * xlcof * axnl;

        // Kepler's equation
        let u = (xl - el.nodep) % TAU;
        let mut eo1 = u;
        let mut tem5: f64 = 9999.9;
        let (mut sineo1, mut coseo1) = (0.0, 0.0);
        let mut ktr = 1;
        while tem5.abs() >= KEPLER_TOL && ktr <= KEPLER_MAX_ITER {
            sineo1 = eo1.sin();
            coseo1 = eo1.cos();
            tem5 = 1.0 - coseo1 * axnl - sineo1 * aynl;
            tem5 = (u - aynl * coseo1 + axnl * sineo1 - eo1) / tem5;
            if tem5.abs() >= 0.95 {
                tem5 = if tem5 > 0.0 { 0.95 } else { -0.95 };
            }
            eo1 += tem5;
            ktr += 1;
        }

        // Short-period periodics
        let ecose = axnl * coseo1 + aynl * sineo1;
        let esine = axnl * sineo1 - aynl * coseo1;
        let el2 = axnl * axnl + aynl * aynl;
        let pl = am * (1.0 - el2);
        ensure!(pl >= 0.0, NegativeSemiLatusRectumSnafu { slr_er: pl });

        let rl = am * (1.0 - ecose);
        let rdotl = am.sqrt() * esine / rl;
        let rvdotl = pl.sqrt() / rl;
        let betal = (1.0 - el2).sqrt();
        let temp = esine / (1.0 + betal);
        let sinu = am / rl * (sineo1 - aynl - axnl * temp);
        let cosu = am / rl * (coseo1 - axnl + aynl * temp);
        let mut su = sinu.atan2(cosu);
        let sin2u = (cosu + cosu) * sinu;
        let cos2u = 1.0 - 2.0 * sinu * sinu;
        let temp = 1.0 / pl;
        let temp1 = 0.5 * self.grav.j2 * temp;
        let temp2 = temp1 * temp;

        let (con41, x1mth2, x7thm1) = if self.is_deep_space() {
            let cosisq = cosip * cosip;
            (3.0 * cosisq - 1.0, 1.0 - cosisq, 7.0 * cosisq - 1.0)
        } else {
            (self.con41, self.x1mth2, self.x7thm1)
        };

        let mrt = rl * (1.0 - 1.5 * temp2 * betal * con41) + 0.5 * temp1 * x1mth2 * cos2u;
        su -= 0.25 * temp2 * x7thm1 * sin2u;
        let xnode = el.nodep + 1.5 * temp2 * cosip * sin2u;
        let xinc = el.inclp + 1.5 * temp2 * cosip * sinip * cos2u;
        let mvt = rdotl - nm * temp1 * x1mth2 * sin2u / xke;
        let rvdot = rvdotl + nm * temp1 * (x1mth2 * cos2u + 1.5 * con41) / xke;

        // Orientation vectors
        let (sinsu, cossu) = su.sin_cos();
        let (snod, cnod) = xnode.sin_cos();
        let (sini, cosi) = xinc.sin_cos();
        let xmx = -snod * cosi;
        let xmy = cnod * cosi;
        let ux = xmx * sinsu + cnod * cossu;
        let uy = xmy * sinsu + snod * cossu;
        let uz = sini * sinsu;
        let vx = xmx * cossu - cnod * sinsu;
        let vy = xmy * cossu - snod * sinsu;
        let vz = sini * cossu;

        ensure!(
            mrt >= 1.0,
            DecayedSnafu {
                minutes: t,
                radius_er: mrt
            }
        );

        let mr = mrt * self.grav.radius_km;
        let vkmpersec = self.grav.vkmpersec();

        Ok(TemeState {
            position_km: Vector3::new(mr * ux, mr * uy, mr * uz),
            velocity_km_s: Vector3::new(
                (mvt * ux + rvdot * vx) * vkmpersec,
                (mvt * uy + rvdot * vy) * vkmpersec,
                (mvt * uz + rvdot * vz) * vkmpersec,
            ),
        })
    }
}

#[cfg(test)]
mod ut_propagate {
    use super::*;
    use crate::sgp4::{Sgp4Config, XPDOTP};
    use approx::assert_abs_diff_eq;

    fn iss_like() -> Sgp4 {
        Sgp4::from_kozai_elements(
            &Sgp4Config::default(),
            25_915.281_817_95,
            2.7992e-5,
            0.000_173_1,
            128.2351_f64.to_radians(),
            51.6443_f64.to_radians(),
            43.6939_f64.to_radians(),
            15.491_841_06 / XPDOTP,
            177.357_f64.to_radians(),
        )
        .unwrap()
    }

    #[test]
    fn fresh_and_reused_scratch_agree() {
        let sgp4 = iss_like();
        let mut scratch = ResonanceState::default();
        for minutes in [0.0, 10.0, 720.0, 1440.0, -360.0] {
            let fresh = sgp4.propagate(minutes).unwrap();
            let reused = sgp4.propagate_with(&mut scratch, minutes).unwrap();
            assert_eq!(fresh, reused);
        }
    }

    #[test]
    fn energy_is_nearly_constant() {
        let sgp4 = iss_like();
        let mu = sgp4.grav.mu_km3_s2;
        let energy = |minutes: f64| {
            let state = sgp4.propagate(minutes).unwrap();
            state.velocity_km_s.norm_squared() / 2.0 - mu / state.position_km.norm()
        };
        let e0 = energy(0.0);
        for minutes in [30.0, 60.0, 90.0] {
            // J2 short-period terms only move the osculating energy by a fraction of a percent
            assert_abs_diff_eq!(energy(minutes), e0, epsilon = 0.1);
        }
    }
}
