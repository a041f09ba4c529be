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

//! Deep-space (SDP4) terms, used for orbits whose period is at least 225 minutes.
//!
//! The lunar and solar gravity contribute secular rates and long-period periodics to every deep-space orbit.
//! Orbits near the one-day (geosynchronous) or half-day (Molniya-type) commensurability additionally
//! integrate the geopotential resonance with fixed 720 minute steps.

use std::f64::consts::{PI, TAU};

use super::{OpsMode, ResonanceState, Sgp4};

const ZNS: f64 = 1.19459e-5;
const ZES: f64 = 0.01675;
const ZNL: f64 = 1.583_521_8e-4;
const ZEL: f64 = 0.05490;
/// Earth rotation rate, rad/min
const RPTIM: f64 = 4.375_269_088_011_299_66e-3;
/// Resonance integrator step, minutes
const STEPP: f64 = 720.0;
const STEPN: f64 = -720.0;
const STEP2: f64 = 259_200.0;

/// Secular element state shared by the near-earth and deep-space branches during a single evaluation.
#[derive(Copy, Clone, Debug)]
pub(crate) struct MeanState {
    pub em: f64,
    pub argpm: f64,
    pub inclm: f64,
    pub mm: f64,
    pub nodem: f64,
    pub nm: f64,
}

/// Elements after the luni-solar long-period periodics have been applied.
#[derive(Copy, Clone, Debug)]
pub(crate) struct PerturbedElements {
    pub ep: f64,
    pub inclp: f64,
    pub nodep: f64,
    pub argpp: f64,
    pub mp: f64,
}

/// Long-period periodic coefficients of the sun (`s*`) and of the moon (remaining fields).
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LuniSolarTerms {
    se2: f64,
    se3: f64,
    si2: f64,
    si3: f64,
    sl2: f64,
    sl3: f64,
    sl4: f64,
    sgh2: f64,
    sgh3: f64,
    sgh4: f64,
    sh2: f64,
    sh3: f64,
    ee2: f64,
    e3: f64,
    xi2: f64,
    xi3: f64,
    xl2: f64,
    xl3: f64,
    xl4: f64,
    xgh2: f64,
    xgh3: f64,
    xgh4: f64,
    xh2: f64,
    xh3: f64,
    zmol: f64,
    zmos: f64,
}

/// Geopotential resonance class of a deep-space orbit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Resonance {
    None,
    /// One-day period, i.e. geosynchronous
    Synchronous {
        del1: f64,
        del2: f64,
        del3: f64,
        xfact: f64,
        xlamo: f64,
    },
    /// Half-day period with an eccentricity of at least 0.5
    HalfDay {
        d2201: f64,
        d2211: f64,
        d3210: f64,
        d3222: f64,
        d4410: f64,
        d4422: f64,
        d5220: f64,
        d5232: f64,
        d5421: f64,
        d5433: f64,
        xfact: f64,
        xlamo: f64,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct DeepSpace {
    pub(crate) periodics: LuniSolarTerms,
    dedt: f64,
    didt: f64,
    dmdt: f64,
    dnodt: f64,
    domdt: f64,
    pub(crate) resonance: Resonance,
}

/// Geometry of one perturbing body with respect to the orbit, at epoch.
#[derive(Copy, Clone, Debug, Default)]
struct ThirdBody {
    s1: f64,
    s2: f64,
    s3: f64,
    s4: f64,
    s5: f64,
    s6: f64,
    s7: f64,
    z1: f64,
    z2: f64,
    z3: f64,
    z11: f64,
    z12: f64,
    z13: f64,
    z21: f64,
    z22: f64,
    z23: f64,
    z31: f64,
    z32: f64,
    z33: f64,
}

/// Orientation of a perturbing body's orbit: cos/sin of its perigee, inclination and node.
struct BodyOrientation {
    zcosg: f64,
    zsing: f64,
    zcosi: f64,
    zsini: f64,
    zcosh: f64,
    zsinh: f64,
    /// Gravity coefficient of the body
    cc: f64,
}

/// Orbit quantities at epoch needed by the luni-solar geometry.
struct OrbitGeometry {
    em: f64,
    emsq: f64,
    sinim: f64,
    cosim: f64,
    sinomm: f64,
    cosomm: f64,
    xnoi: f64,
}

impl ThirdBody {
    fn new(orbit: &OrbitGeometry, body: &BodyOrientation) -> Self {
        let OrbitGeometry {
            em,
            emsq,
            sinim,
            cosim,
            sinomm,
            cosomm,
            xnoi,
        } = *orbit;
        let BodyOrientation {
            zcosg,
            zsing,
            zcosi,
            zsini,
            zcosh,
            zsinh,
            cc,
        } = *body;

        let betasq = 1.0 - emsq;
        let rtemsq = betasq.sqrt();

        let a1 = zcosg * zcosh + zsing * zcosi * zsinh;
        let a3 = -zsing * zcosh + zcosg * zcosi * zsinh;
        let a7 = -zcosg * zsinh + zsing * zcosi * zcosh;
        let a8 = zsing * zsini;
        let a9 = zsing * zsinh + zcosg * zcosi * zcosh;
        let a10 = zcosg * zsini;
        let a2 = cosim * a7 + sinim * a8;
        let a4 = cosim * a9 + sinim * a10;
        let a5 = -sinim * a7 + cosim * a8;
        let a6 = -sinim * a9 + cosim * a10;

        let x1 = a1 * cosomm + a2 * sinomm;
        let x2 = a3 * cosomm + a4 * sinomm;
        let x3 = -a1 * sinomm + a2 * cosomm;
        let x4 = -a3 * sinomm + a4 * cosomm;
        let x5 = a5 * sinomm;
        let x6 = a6 * sinomm;
        let x7 = a5 * cosomm;
        let x8 = a6 * cosomm;

        let z31 = 12.0 * x1 * x1 - 3.0 * x3 * x3;
        let z32 = 24.0 * x1 * x2 - 6.0 * x3 * x4;
        let z33 = 12.0 * x2 * x2 - 3.0 * x4 * x4;
        let z1 = 3.0 * (a1 * a1 + a2 * a2) + z31 * emsq;
        let z2 = 6.0 * (a1 * a3 + a2 * a4) + z32 * emsq;
        let z3 = 3.0 * (a3 * a3 + a4 * a4) + z33 * emsq;
        let z11 = -6.0 * a1 * a5 + emsq * (-24.0 * x1 * x7 - 6.0 * x3 * x5);
        let z12 = -6.0 * (a1 * a6 + a3 * a5)
            + emsq * (-24.0 * (x2 * x7 + x1 * x8) - 6.0 * (x3 * x6 + x4 * x5));
        let z13 = -6.0 * a3 * a6 + emsq * (-24.0 * x2 * x8 - 6.0 * x4 * x6);
        let z21 = 6.0 * a2 * a5 + emsq * (24.0 * x1 * x5 - 6.0 * x3 * x7);
        let z22 = 6.0 * (a4 * a5 + a2 * a6)
            + emsq * (24.0 * (x2 * x5 + x1 * x6) - 6.0 * (x4 * x7 + x3 * x8));
        let z23 = 6.0 * a4 * a6 + emsq * (24.0 * x2 * x6 - 6.0 * x4 * x8);
        let z1 = z1 + z1 + betasq * z31;
        let z2 = z2 + z2 + betasq * z32;
        let z3 = z3 + z3 + betasq * z33;

        let s3 = cc * xnoi;
        let s2 = -0.5 * s3 / rtemsq;
        let s4 = s3 * rtemsq;
        let s1 = -15.0 * em * s4;

        Self {
            s1,
            s2,
            s3,
            s4,
            s5: x1 * x3 + x2 * x4,
            s6: x2 * x3 + x1 * x4,
            s7: x2 * x4 - x1 * x3,
            z1,
            z2,
            z3,
            z11,
            z12,
            z13,
            z21,
            z22,
            z23,
            z31,
            z32,
            z33,
        }
    }
}

impl DeepSpace {
    /// Derives the luni-solar and resonance terms of a deep-space orbit.
    ///
    /// `epoch` is the element epoch in days since 1949 December 31 00:00 UT. The secular rates of the
    /// zonal harmonics must already be set on `sgp4`.
    pub(crate) fn new(sgp4: &Sgp4, epoch: f64) -> Self {
        let em = sgp4.ecco;
        let emsq = em * em;
        let nm = sgp4.no_unkozai;
        let (snodm, cnodm) = sgp4.nodeo.sin_cos();
        let (sinim, cosim) = sgp4.inclo.sin_cos();
        let (sinomm, cosomm) = sgp4.argpo.sin_cos();

        // Lunar ephemeris at epoch
        let day = epoch + 18_261.5;
        let xnodce = (4.523_602_0 - 9.242_202_9e-4 * day) % TAU;
        let (stem, ctem) = xnodce.sin_cos();
        let zcosil = 0.913_751_64 - 0.035_680_96 * ctem;
        let zsinil = (1.0 - zcosil * zcosil).sqrt();
        let zsinhl = 0.089_683_511 * stem / zsinil;
        let zcoshl = (1.0 - zsinhl * zsinhl).sqrt();
        let gam = 5.835_151_4 + 0.001_944_368_0 * day;
        let zx = 0.397_854_16 * stem / zsinil;
        let zy = zcoshl * ctem + 0.917_448_67 * zsinhl * stem;
        let zx = gam + zx.atan2(zy) - xnodce;
        let (zsingl, zcosgl) = zx.sin_cos();

        let orbit = OrbitGeometry {
            em,
            emsq,
            sinim,
            cosim,
            sinomm,
            cosomm,
            xnoi: 1.0 / nm,
        };

        let sun = ThirdBody::new(
            &orbit,
            &BodyOrientation {
                zcosg: 0.194_590_5,
                zsing: -0.980_884_58,
                zcosi: 0.917_448_67,
                zsini: 0.397_854_16,
                zcosh: cnodm,
                zsinh: snodm,
                cc: 2.986_479_7e-6,
            },
        );
        let moon = ThirdBody::new(
            &orbit,
            &BodyOrientation {
                zcosg: zcosgl,
                zsing: zsingl,
                zcosi: zcosil,
                zsini: zsinil,
                zcosh: zcoshl * cnodm + zsinhl * snodm,
                zsinh: snodm * zcoshl - cnodm * zsinhl,
                cc: 4.796_806_5e-7,
            },
        );

        let periodics = LuniSolarTerms {
            se2: 2.0 * sun.s1 * sun.s6,
            se3: 2.0 * sun.s1 * sun.s7,
            si2: 2.0 * sun.s2 * sun.z12,
            si3: 2.0 * sun.s2 * (sun.z13 - sun.z11),
            sl2: -2.0 * sun.s3 * sun.z2,
            sl3: -2.0 * sun.s3 * (sun.z3 - sun.z1),
            sl4: -2.0 * sun.s3 * (-21.0 - 9.0 * emsq) * ZES,
            sgh2: 2.0 * sun.s4 * sun.z32,
            sgh3: 2.0 * sun.s4 * (sun.z33 - sun.z31),
            sgh4: -18.0 * sun.s4 * ZES,
            sh2: -2.0 * sun.s2 * sun.z22,
            sh3: -2.0 * sun.s2 * (sun.z23 - sun.z21),
            ee2: 2.0 * moon.s1 * moon.s6,
            e3: 2.0 * moon.s1 * moon.s7,
            xi2: 2.0 * moon.s2 * moon.z12,
            xi3: 2.0 * moon.s2 * (moon.z13 - moon.z11),
            xl2: -2.0 * moon.s3 * moon.z2,
            xl3: -2.0 * moon.s3 * (moon.z3 - moon.z1),
            xl4: -2.0 * moon.s3 * (-21.0 - 9.0 * emsq) * ZEL,
            xgh2: 2.0 * moon.s4 * moon.z32,
            xgh3: 2.0 * moon.s4 * (moon.z33 - moon.z31),
            xgh4: -18.0 * moon.s4 * ZEL,
            xh2: -2.0 * moon.s2 * moon.z22,
            xh3: -2.0 * moon.s2 * (moon.z23 - moon.z21),
            zmol: (4.719_967_2 + 0.229_971_50 * day - gam) % TAU,
            zmos: (6.256_583_7 + 0.017_201_977 * day) % TAU,
        };

        // Secular rates from the sun and the moon
        let near_equatorial = sgp4.inclo < 5.235_987_7e-2 || sgp4.inclo > PI - 5.235_987_7e-2;

        let ses = sun.s1 * ZNS * sun.s5;
        let sis = sun.s2 * ZNS * (sun.z11 + sun.z13);
        let sls = -ZNS * sun.s3 * (sun.z1 + sun.z3 - 14.0 - 6.0 * emsq);
        let sghs = sun.s4 * ZNS * (sun.z31 + sun.z33 - 6.0);
        let mut shs = -ZNS * sun.s2 * (sun.z21 + sun.z23);
        if near_equatorial {
            shs = 0.0;
        }
        if sinim != 0.0 {
            shs /= sinim;
        }
        let sgs = sghs - cosim * shs;

        let dedt = ses + moon.s1 * ZNL * moon.s5;
        let didt = sis + moon.s2 * ZNL * (moon.z11 + moon.z13);
        let dmdt = sls - ZNL * moon.s3 * (moon.z1 + moon.z3 - 14.0 - 6.0 * emsq);
        let sghl = moon.s4 * ZNL * (moon.z31 + moon.z33 - 6.0);
        let mut shll = -ZNL * moon.s2 * (moon.z21 + moon.z23);
        if near_equatorial {
            shll = 0.0;
        }
        let mut domdt = sgs + sghl;
        let mut dnodt = shs;
        if sinim != 0.0 {
            domdt -= cosim / sinim * shll;
            dnodt += shll / sinim;
        }

        let theta = sgp4.gsto % TAU;
        let aonv = (nm / sgp4.grav.xke).powf(2.0 / 3.0);

        let xpidot = sgp4.argpdot + sgp4.nodedot;

        let resonance = if nm < 0.005_235_987_7 && nm > 0.003_490_658_5 {
            let g200 = 1.0 + emsq * (-2.5 + 0.8125 * emsq);
            let g310 = 1.0 + 2.0 * emsq;
            let g300 = 1.0 + emsq * (-6.0 + 6.609_37 * emsq);
            let f220 = 0.75 * (1.0 + cosim) * (1.0 + cosim);
            let f311 = 0.9375 * sinim * sinim * (1.0 + 3.0 * cosim) - 0.75 * (1.0 + cosim);
            let f330 = 1.0 + cosim;
            let f330 = 1.875 * f330 * f330 * f330;
            let del1 = 3.0 * nm * nm * aonv * aonv;

            Resonance::Synchronous {
                del1: del1 * f311 * g310 * 2.146_074_8e-6 * aonv,
                del2: 2.0 * del1 * f220 * g200 * 1.789_167_9e-6,
                del3: 3.0 * del1 * f330 * g300 * 2.212_301_5e-7 * aonv,
                xfact: sgp4.mdot + xpidot - RPTIM + dmdt + domdt + dnodt - nm,
                xlamo: (sgp4.mo + sgp4.nodeo + sgp4.argpo - theta) % TAU,
            }
        } else if (8.26e-3..=9.24e-3).contains(&nm) && em >= 0.5 {
            half_day_resonance(sgp4, em, sinim, cosim, aonv, theta, dmdt, dnodt)
        } else {
            Resonance::None
        };

        Self {
            periodics,
            dedt,
            didt,
            dmdt,
            dnodt,
            domdt,
            resonance,
        }
    }

    /// Applies the luni-solar secular rates and, for resonant orbits, integrates the resonance up to `t` minutes.
    pub(crate) fn secular(
        &self,
        sgp4: &Sgp4,
        scratch: &mut ResonanceState,
        t: f64,
        mean: &mut MeanState,
    ) {
        let no = sgp4.no_unkozai;
        let theta = (sgp4.gsto + t * RPTIM) % TAU;

        mean.em += self.dedt * t;
        mean.inclm += self.didt * t;
        mean.argpm += self.domdt * t;
        mean.nodem += self.dnodt * t;
        mean.mm += self.dmdt * t;

        let (xfact, xlamo) = match self.resonance {
            Resonance::None => return,
            Resonance::Synchronous { xfact, xlamo, .. } => (xfact, xlamo),
            Resonance::HalfDay { xfact, xlamo, .. } => (xfact, xlamo),
        };

        // Restart the integration from epoch unless the previous state lies between epoch and t
        if scratch.atime == 0.0 || t * scratch.atime <= 0.0 || t.abs() < scratch.atime.abs() {
            scratch.atime = 0.0;
            scratch.xni = no;
            scratch.xli = xlamo;
        }
        let delt = if t > 0.0 { STEPP } else { STEPN };

        let ft = loop {
            let (xndt, xnddt) = self.resonance.rates(sgp4, scratch);
            let xldot = scratch.xni + xfact;
            let xnddt = xnddt * xldot;

            if (t - scratch.atime).abs() >= STEPP {
                scratch.xli += xldot * delt + xndt * STEP2;
                scratch.xni += xndt * delt + xnddt * STEP2;
                scratch.atime += delt;
            } else {
                let ft = t - scratch.atime;
                mean.nm = scratch.xni + xndt * ft + xnddt * ft * ft * 0.5;
                break scratch.xli + xldot * ft + xndt * ft * ft * 0.5;
            }
        };

        // `ft` now holds the integrated mean longitude
        mean.mm = match self.resonance {
            Resonance::Synchronous { .. } => ft - mean.nodem - mean.argpm + theta,
            _ => ft - 2.0 * mean.nodem + 2.0 * theta,
        };
        // Going through the rate rounds like the published vectors do
        let dndt = mean.nm - no;
        mean.nm = no + dndt;
    }

    /// Applies the luni-solar long-period periodics at `t` minutes from epoch.
    pub(crate) fn periodics(&self, t: f64, ops_mode: OpsMode, el: &mut PerturbedElements) {
        let p = &self.periodics;

        let zm = p.zmos + ZNS * t;
        let zf = zm + 2.0 * ZES * zm.sin();
        let sinzf = zf.sin();
        let f2 = 0.5 * sinzf * sinzf - 0.25;
        let f3 = -0.5 * sinzf * zf.cos();
        let ses = p.se2 * f2 + p.se3 * f3;
        let sis = p.si2 * f2 + p.si3 * f3;
        let sls = p.sl2 * f2 + p.sl3 * f3 + p.sl4 * sinzf;
        let sghs = p.sgh2 * f2 + p.sgh3 * f3 + p.sgh4 * sinzf;
        let shs = p.sh2 * f2 + p.sh3 * f3;

        let zm = p.zmol + ZNL * t;
        let zf = zm + 2.0 * ZEL * zm.sin();
        let sinzf = zf.sin();
        let f2 = 0.5 * sinzf * sinzf - 0.25;
        let f3 = -0.5 * sinzf * zf.cos();
        let sel = p.ee2 * f2 + p.e3 * f3;
        let sil = p.xi2 * f2 + p.xi3 * f3;
        let sll = p.xl2 * f2 + p.xl3 * f3 + p.xl4 * sinzf;
        let sghl = p.xgh2 * f2 + p.xgh3 * f3 + p.xgh4 * sinzf;
        let shll = p.xh2 * f2 + p.xh3 * f3;

        let pe = ses + sel;
        let pinc = sis + sil;
        let pl = sls + sll;
        let pgh = sghs + sghl;
        let ph = shs + shll;

        el.inclp += pinc;
        el.ep += pe;
        let (sinip, cosip) = el.inclp.sin_cos();

        if el.inclp >= 0.2 {
            let ph = ph / sinip;
            el.argpp += pgh - cosip * ph;
            el.nodep += ph;
            el.mp += pl;
        } else {
            // Lyddane modification for low inclinations
            let (sinop, cosop) = el.nodep.sin_cos();
            let alfdp = sinip * sinop + (ph * cosop + pinc * cosip * sinop);
            let betdp = sinip * cosop + (-ph * sinop + pinc * cosip * cosop);
            el.nodep %= TAU;
            if el.nodep < 0.0 && ops_mode == OpsMode::Afspc {
                el.nodep += TAU;
            }
            let xls = el.mp + el.argpp + cosip * el.nodep;
            let dls = pl + pgh - pinc * el.nodep * sinip;
            let xls = xls + dls;
            let xnoh = el.nodep;
            el.nodep = alfdp.atan2(betdp);
            if el.nodep < 0.0 && ops_mode == OpsMode::Afspc {
                el.nodep += TAU;
            }
            if (xnoh - el.nodep).abs() > PI {
                if el.nodep < xnoh {
                    el.nodep += TAU;
                } else {
                    el.nodep -= TAU;
                }
            }
            el.mp += pl;
            el.argpp = xls - el.mp - cosip * el.nodep;
        }
    }
}

impl Resonance {
    /// First and second derivatives of the resonant mean motion at the current integrator state.
    fn rates(&self, sgp4: &Sgp4, scratch: &ResonanceState) -> (f64, f64) {
        const FASX2: f64 = 0.131_309_08;
        const FASX4: f64 = 2.884_319_8;
        const FASX6: f64 = 0.374_480_87;
        const G22: f64 = 5.768_639_6;
        const G32: f64 = 0.952_408_98;
        const G44: f64 = 1.801_499_8;
        const G52: f64 = 1.050_833_0;
        const G54: f64 = 4.410_889_8;

        let xli = scratch.xli;
        match *self {
            Self::None => (0.0, 0.0),
            Self::Synchronous {
                del1, del2, del3, ..
            } => {
                let xndt = del1 * (xli - FASX2).sin()
                    + del2 * (2.0 * (xli - FASX4)).sin()
                    + del3 * (3.0 * (xli - FASX6)).sin();
                let xnddt = del1 * (xli - FASX2).cos()
                    + 2.0 * del2 * (2.0 * (xli - FASX4)).cos()
                    + 3.0 * del3 * (3.0 * (xli - FASX6)).cos();
                (xndt, xnddt)
            }
            Self::HalfDay {
                d2201,
                d2211,
                d3210,
                d3222,
                d4410,
                d4422,
                d5220,
                d5232,
                d5421,
                d5433,
                ..
            } => {
                let xomi = sgp4.argpo + sgp4.argpdot * scratch.atime;
                let x2omi = xomi + xomi;
                let x2li = xli + xli;
                let xndt = d2201 * (x2omi + xli - G22).sin()
                    + d2211 * (xli - G22).sin()
                    + d3210 * (xomi + xli - G32).sin()
                    + d3222 * (-xomi + xli - G32).sin()
                    + d4410 * (x2omi + x2li - G44).sin()
                    + d4422 * (x2li - G44).sin()
                    + d5220 * (xomi + xli - G52).sin()
                    + d5232 * (-xomi + xli - G52).sin()
                    + d5421 * (xomi + x2li - G54).sin()
                    + d5433 * (-xomi + x2li - G54).sin();
                let xnddt = d2201 * (x2omi + xli - G22).cos()
                    + d2211 * (xli - G22).cos()
                    + d3210 * (xomi + xli - G32).cos()
                    + d3222 * (-xomi + xli - G32).cos()
                    + d5220 * (xomi + xli - G52).cos()
                    + d5232 * (-xomi + xli - G52).cos()
                    + 2.0
                        * (d4410 * (x2omi + x2li - G44).cos()
                            + d4422 * (x2li - G44).cos()
                            + d5421 * (xomi + x2li - G54).cos()
                            + d5433 * (-xomi + x2li - G54).cos());
                (xndt, xnddt)
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn half_day_resonance(
    sgp4: &Sgp4,
    em: f64,
    sinim: f64,
    cosim: f64,
    aonv: f64,
    theta: f64,
    dmdt: f64,
    dnodt: f64,
) -> Resonance {
    const ROOT22: f64 = 1.789_167_9e-6;
    const ROOT32: f64 = 3.739_379_2e-7;
    const ROOT44: f64 = 7.363_695_3e-9;
    const ROOT52: f64 = 1.142_863_9e-7;
    const ROOT54: f64 = 2.176_580_3e-9;

    let nm = sgp4.no_unkozai;
    let cosisq = cosim * cosim;
    let emsq = em * em;
    let eoc = em * emsq;

    let g201 = -0.306 - (em - 0.64) * 0.440;
    let (g211, g310, g322, g410, g422, g520);
    if em <= 0.65 {
        g211 = 3.616 - 13.2470 * em + 16.2900 * emsq;
        g310 = -19.302 + 117.3900 * em - 228.4190 * emsq + 156.5910 * eoc;
        g322 = -18.9068 + 109.7927 * em - 214.6334 * emsq + 146.5816 * eoc;
        g410 = -41.122 + 242.6940 * em - 471.0940 * emsq + 313.9530 * eoc;
        g422 = -146.407 + 841.8800 * em - 1629.014 * emsq + 1083.4350 * eoc;
        g520 = -532.114 + 3017.977 * em - 5740.032 * emsq + 3708.2760 * eoc;
    } else {
        g211 = -72.099 + 331.819 * em - 508.738 * emsq + 266.724 * eoc;
        g310 = -346.844 + 1582.851 * em - 2415.925 * emsq + 1246.113 * eoc;
        g322 = -342.585 + 1554.908 * em - 2366.899 * emsq + 1215.972 * eoc;
        g410 = -1052.797 + 4758.686 * em - 7193.992 * emsq + 3651.957 * eoc;
        g422 = -3581.690 + 16178.110 * em - 24462.770 * emsq + 12422.520 * eoc;
        g520 = if em > 0.715 {
            -5149.66 + 29936.92 * em - 54087.36 * emsq + 31324.56 * eoc
        } else {
            1464.74 - 4664.75 * em + 3763.64 * emsq
        };
    }
    let (g533, g521, g532) = if em < 0.7 {
        (
            -919.22770 + 4988.6100 * em - 9064.7700 * emsq + 5542.21 * eoc,
            -822.71072 + 4568.6173 * em - 8491.4146 * emsq + 5337.524 * eoc,
            -853.66600 + 4690.2500 * em - 8624.7700 * emsq + 5341.4 * eoc,
        )
    } else {
        (
            -37995.780 + 161616.52 * em - 229838.20 * emsq + 109377.94 * eoc,
            -51752.104 + 218913.95 * em - 309468.16 * emsq + 146349.42 * eoc,
            -40023.880 + 170470.89 * em - 242699.48 * emsq + 115605.82 * eoc,
        )
    };

    let sini2 = sinim * sinim;
    let f220 = 0.75 * (1.0 + 2.0 * cosim + cosisq);
    let f221 = 1.5 * sini2;
    let f321 = 1.875 * sinim * (1.0 - 2.0 * cosim - 3.0 * cosisq);
    let f322 = -1.875 * sinim * (1.0 + 2.0 * cosim - 3.0 * cosisq);
    let f441 = 35.0 * sini2 * f220;
    let f442 = 39.3750 * sini2 * sini2;
    let f522 = 9.84375
        * sinim
        * (sini2 * (1.0 - 2.0 * cosim - 5.0 * cosisq)
            + 0.333_333_33 * (-2.0 + 4.0 * cosim + 6.0 * cosisq));
    let f523 = sinim
        * (4.921_875_12 * sini2 * (-2.0 - 4.0 * cosim + 10.0 * cosisq)
            + 6.562_500_12 * (1.0 + 2.0 * cosim - 3.0 * cosisq));
    let f542 = 29.53125
        * sinim
        * (2.0 - 8.0 * cosim + cosisq * (-12.0 + 8.0 * cosim + 10.0 * cosisq));
    let f543 = 29.53125
        * sinim
        * (-2.0 - 8.0 * cosim + cosisq * (12.0 + 8.0 * cosim - 10.0 * cosisq));

    let xno2 = nm * nm;
    let ainv2 = aonv * aonv;
    let temp1 = 3.0 * xno2 * ainv2;
    let temp = temp1 * ROOT22;
    let d2201 = temp * f220 * g201;
    let d2211 = temp * f221 * g211;
    let temp1 = temp1 * aonv;
    let temp = temp1 * ROOT32;
    let d3210 = temp * f321 * g310;
    let d3222 = temp * f322 * g322;
    let temp1 = temp1 * aonv;
    let temp = 2.0 * temp1 * ROOT44;
    let d4410 = temp * f441 * g410;
    let d4422 = temp * f442 * g422;
    let temp1 = temp1 * aonv;
    let temp = temp1 * ROOT52;
    let d5220 = temp * f522 * g520;
    let d5232 = temp * f523 * g532;
    let temp = 2.0 * temp1 * ROOT54;
    let d5421 = temp * f542 * g521;
    let d5433 = temp * f543 * g533;

    Resonance::HalfDay {
        d2201,
        d2211,
        d3210,
        d3222,
        d4410,
        d4422,
        d5220,
        d5232,
        d5421,
        d5433,
        xfact: sgp4.mdot + dmdt + 2.0 * (sgp4.nodedot + dnodt - RPTIM) - nm,
        xlamo: (sgp4.mo + sgp4.nodeo + sgp4.nodeo - theta - theta) % TAU,
    }
}
