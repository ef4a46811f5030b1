pub mod ort_base;
pub mod ort_koko;
