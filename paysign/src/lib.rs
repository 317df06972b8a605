#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use paysign_core::*;

#[cfg(feature = "wechat")]
pub mod wechat {
    pub use paysign_wechat::*;
}
