use std::net::Ipv4Addr;

pub use ospf_packet::hex2ip;

#[macro_export]
macro_rules! ip {
    ($x:expr) => {
        std::net::IpAddr::V4($x)
    };
}

#[macro_export]
macro_rules! hex {
    ($a:expr, $b:expr, $c:expr, $d:expr) => {
        ($a as u32) << 24 | ($b as u32) << 16 | ($c as u32) << 8 | ($d as u32)
    };
}

pub const fn ip2hex(ip: Ipv4Addr) -> u32 {
    u32::from_be_bytes(ip.octets())
}

pub fn same_subnet(a: Ipv4Addr, b: Ipv4Addr, mask: Ipv4Addr) -> bool {
    ip2hex(a) & ip2hex(mask) == ip2hex(b) & ip2hex(mask)
}
