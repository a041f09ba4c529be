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

use std::f64::consts::TAU;

use snafu::ensure;

use super::deep_space::DeepSpace;
use super::{
    GravityConstants, HigherOrderDrag, InvalidMeanElementsSnafu, NegativeMeanMotionSnafu,
    OpsMode, Regime, Sgp4, Sgp4Config, Sgp4Error, DEEP_SPACE_PERIOD_MIN, XPDOTP,
};
use crate::cosmic::geodetic::gmst_from_jd;
use crate::tle::MeanElements;

const X2O3: f64 = 2.0 / 3.0;
/// Divisor used instead of 1 + cos(i) for retrograde equatorial orbits.
pub(crate) const TEMP4: f64 = 1.5e-12;
/// Julian date of 1949 December 31 00:00 UT, origin of the deep-space epoch.
pub const JD_1950: f64 = 2_433_281.5;

/// Greenwich sidereal angle at `epoch` (days since 1950) from the 1970 polynomial used in AFSPC operations.
fn gsto_afspc(epoch: f64) -> f64 {
    const C1: f64 = 1.720_279_169_407_036_39e-2;
    const THGR70: f64 = 1.732_134_385_650_937_4;
    const FK5R: f64 = 5.075_514_194_322_694_42e-15;

    let ts70 = epoch - 7305.0;
    let ds70 = (ts70 + 1.0e-8).floor();
    let tfrac = ts70 - ds70;
    let c1p2p = C1 + TAU;
    let gsto = (THGR70 + C1 * ds70 + c1p2p * tfrac + ts70 * ts70 * FK5R) % TAU;
    if gsto < 0.0 {
        gsto + TAU
    } else {
        gsto
    }
}

impl Sgp4 {
    /// Initializes the working record from the provided mean elements.
    ///
    /// Fails with the error codes 1 through 5 if the elements cannot be propagated at all.
    pub fn new(elements: &MeanElements, config: &Sgp4Config) -> Result<Self, Sgp4Error> {
        Self::from_kozai_elements(
            config,
            elements.days_since_1950(),
            elements.bstar,
            elements.eccentricity,
            elements.arg_perigee_deg.to_radians(),
            elements.inclination_deg.to_radians(),
            elements.mean_anomaly_deg.to_radians(),
            elements.mean_motion_rev_day / XPDOTP,
            elements.raan_deg.to_radians(),
        )
    }

    /// Initializes the working record from elements in SGP4 units: radians and Kozai mean motion in radians per minute.
    /// The `epoch` is in days since 1949 December 31 00:00 UT, see [`JD_1950`].
    #[allow(clippy::too_many_arguments)]
    pub fn from_kozai_elements(
        config: &Sgp4Config,
        epoch: f64,
        bstar: f64,
        ecco: f64,
        argpo: f64,
        inclo: f64,
        mo: f64,
        no_kozai: f64,
        nodeo: f64,
    ) -> Result<Self, Sgp4Error> {
        let grav = GravityConstants::from(config.gravity);

        ensure!(
            ecco.is_finite() && (-0.001..1.0).contains(&ecco),
            InvalidMeanElementsSnafu {
                ecc: ecco,
                sma_er: f64::NAN
            }
        );
        ensure!(
            no_kozai.is_finite() && no_kozai > 0.0,
            NegativeMeanMotionSnafu {
                mean_motion_rad_min: no_kozai
            }
        );

        // Recover the Brouwer mean motion from the Kozai one
        let eccsq = ecco * ecco;
        let omeosq = 1.0 - eccsq;
        let rteosq = omeosq.sqrt();
        let cosio = inclo.cos();
        let cosio2 = cosio * cosio;

        let ak = (grav.xke / no_kozai).powf(X2O3);
        let d1 = 0.75 * grav.j2 * (3.0 * cosio2 - 1.0) / (rteosq * omeosq);
        let del = d1 / (ak * ak);
        let adel = ak * (1.0 - del * del - del * (1.0 / 3.0 + 134.0 * del * del / 81.0));
        let del = d1 / (adel * adel);
        let no_unkozai = no_kozai / (1.0 + del);

        let ao = (grav.xke / no_unkozai).powf(X2O3);
        ensure!(
            ao >= 0.95,
            InvalidMeanElementsSnafu {
                ecc: ecco,
                sma_er: ao
            }
        );

        let sinio = inclo.sin();
        let po = ao * omeosq;
        let con42 = 1.0 - 5.0 * cosio2;
        let con41 = -con42 - cosio2 - cosio2;
        let posq = po * po;
        let rp = ao * (1.0 - ecco);

        let gsto = match config.ops_mode {
            OpsMode::Afspc => gsto_afspc(epoch),
            OpsMode::Improved => gmst_from_jd(epoch + JD_1950),
        };

        // Atmospheric density fit parameters, adjusted for low perigees
        let ss = 78.0 / grav.radius_km + 1.0;
        let qzms2ttemp = (120.0 - 78.0) / grav.radius_km;
        let qzms2t = qzms2ttemp * qzms2ttemp * qzms2ttemp * qzms2ttemp;
        let mut sfour = ss;
        let mut qzms24 = qzms2t;
        let perige = (rp - 1.0) * grav.radius_km;
        if perige < 156.0 {
            sfour = if perige < 98.0 { 20.0 } else { perige - 78.0 };
            qzms24 = ((120.0 - sfour) / grav.radius_km).powf(4.0);
            sfour = sfour / grav.radius_km + 1.0;
        }

        let pinvsq = 1.0 / posq;
        let tsi = 1.0 / (ao - sfour);
        let eta = ao * ecco * tsi;
        let etasq = eta * eta;
        let eeta = ecco * eta;
        let psisq = (1.0 - etasq).abs();
        let coef = qzms24 * tsi.powf(4.0);
        let coef1 = coef / psisq.powf(3.5);
        let cc2 = coef1
            * no_unkozai
            * (ao * (1.0 + 1.5 * etasq + eeta * (4.0 + etasq))
                + 0.375 * grav.j2 * tsi / psisq * con41 * (8.0 + 3.0 * etasq * (8.0 + etasq)));
        let cc1 = bstar * cc2;
        let cc3 = if ecco > 1.0e-4 {
            -2.0 * coef * tsi * grav.j3oj2 * no_unkozai * sinio / ecco
        } else {
            0.0
        };
        let x1mth2 = 1.0 - cosio2;
        let cc4 = 2.0
            * no_unkozai
            * coef1
            * ao
            * omeosq
            * (eta * (2.0 + 0.5 * etasq) + ecco * (0.5 + 2.0 * etasq)
                - grav.j2 * tsi / (ao * psisq)
                    * (-3.0 * con41 * (1.0 - 2.0 * eeta + etasq * (1.5 - 0.5 * eeta))
                        + 0.75
                            * x1mth2
                            * (2.0 * etasq - eeta * (1.0 + etasq))
                            * (2.0 * argpo).cos()));
        let cc5 = 2.0 * coef1 * ao * omeosq * (1.0 + 2.75 * (etasq + eeta) + eeta * etasq);

        // Zonal secular rates
        let cosio4 = cosio2 * cosio2;
        let temp1 = 1.5 * grav.j2 * pinvsq * no_unkozai;
        let temp2 = 0.5 * temp1 * grav.j2 * pinvsq;
        let temp3 = -0.46875 * grav.j4 * pinvsq * pinvsq * no_unkozai;
        let mdot = no_unkozai
            + 0.5 * temp1 * rteosq * con41
            + 0.0625 * temp2 * rteosq * (13.0 - 78.0 * cosio2 + 137.0 * cosio4);
        let argpdot = -0.5 * temp1 * con42
            + 0.0625 * temp2 * (7.0 - 114.0 * cosio2 + 395.0 * cosio4)
            + temp3 * (3.0 - 36.0 * cosio2 + 49.0 * cosio4);
        let xhdot1 = -temp1 * cosio;
        let nodedot = xhdot1
            + (0.5 * temp2 * (4.0 - 19.0 * cosio2) + 2.0 * temp3 * (3.0 - 7.0 * cosio2)) * cosio;

        let omgcof = bstar * cc3 * argpo.cos();
        let xmcof = if ecco > 1.0e-4 {
            -X2O3 * coef * bstar / eeta
        } else {
            0.0
        };
        let nodecf = 3.5 * omeosq * xhdot1 * cc1;
        let t2cof = 1.5 * cc1;
        let xlcof = if (cosio + 1.0).abs() > 1.5e-12 {
            -0.25 * grav.j3oj2 * sinio * (3.0 + 5.0 * cosio) / (1.0 + cosio)
        } else {
            -0.25 * grav.j3oj2 * sinio * (3.0 + 5.0 * cosio) / TEMP4
        };
        let aycof = -0.5 * grav.j3oj2 * sinio;
        let delmo = (1.0 + eta * mo.cos()).powf(3.0);
        let sinmao = mo.sin();
        let x7thm1 = 7.0 * cosio2 - 1.0;

        let mut sgp4 = Self {
            model: config.gravity,
            grav,
            ops_mode: config.ops_mode,
            bstar,
            ecco,
            argpo,
            inclo,
            mo,
            nodeo,
            no_kozai,
            no_unkozai,
            gsto,
            mdot,
            argpdot,
            nodedot,
            nodecf,
            cc1,
            cc4,
            t2cof,
            con41,
            x1mth2,
            x7thm1,
            xlcof,
            aycof,
            regime: Regime::NearEarth { drag: None },
        };

        if TAU / no_unkozai >= DEEP_SPACE_PERIOD_MIN {
            sgp4.regime = Regime::DeepSpace(Box::new(DeepSpace::new(&sgp4, epoch)));
        } else if rp >= 220.0 / grav.radius_km + 1.0 {
            let cc1sq = cc1 * cc1;
            let d2 = 4.0 * ao * tsi * cc1sq;
            let temp = d2 * tsi * cc1 / 3.0;
            let d3 = (17.0 * ao + sfour) * temp;
            let d4 = 0.5 * temp * ao * tsi * (221.0 * ao + 31.0 * sfour) * cc1;
            sgp4.regime = Regime::NearEarth {
                drag: Some(HigherOrderDrag {
                    cc5,
                    d2,
                    d3,
                    d4,
                    delmo,
                    eta,
                    omgcof,
                    sinmao,
                    t3cof: d2 + 2.0 * cc1sq,
                    t4cof: 0.25 * (3.0 * d3 + cc1 * (12.0 * d2 + 10.0 * cc1sq)),
                    t5cof: 0.2
                        * (3.0 * d4
                            + 12.0 * cc1 * d3
                            + 6.0 * d2 * d2
                            + 15.0 * cc1sq * (2.0 * d2 + cc1sq)),
                    xmcof,
                }),
            };
        }

        debug!("initialized {sgp4}, gsto = {gsto:.9} rad");

        // Surface the errors of the elements at epoch
        match sgp4.propagate(0.0) {
            Ok(_) => Ok(sgp4),
            Err(Sgp4Error::Decayed { .. }) => Err(Sgp4Error::SubOrbitalEpoch),
            Err(e) => Err(e),
        }
    }
}
