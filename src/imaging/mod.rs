// 画像コーデック層の具象実装

pub mod standard;

pub use standard::StandardImagingBackend;
