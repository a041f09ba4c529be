mod batch;
mod decay;
mod reference;
mod verification;
