//! Mapia request pipeline: contact gating, file intake, area selection,
//! Drive uploads and EmailJS notification for imagery analysis requests.

pub mod area;
pub mod config;
pub mod contact;
pub mod intake;
pub mod notify;
pub mod storage;
pub mod submission;
pub mod view;
