#![allow(non_upper_case_globals)]

use std::net::Ipv4Addr;

pub const AllSPFRouters: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 5);

pub const HelloInterval: u64 = 10;
pub const MaxPacketSize: usize = u16::MAX as usize;
pub const CaptureQueueSize: usize = 64;
pub const DefaultConfigPath: &str = "ospfd.toml";
