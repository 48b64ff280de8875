#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use sk_codec as codec;
pub use sk_reflect as reflect;
