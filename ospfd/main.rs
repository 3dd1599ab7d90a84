use std::{sync::Arc, time::Duration};

use ospfd::{
    capture::CaptureOspfDaemon,
    config::RouterConfig,
    constant::{CaptureQueueSize, DefaultConfigPath},
    daemon::{Daemon, HelloDaemon, ReceiveDaemon},
    handler::ospf_handler_maker,
    interface::Interface,
    log, log_warning, logging,
    transport::RawIpv4Layer,
    util::hex2ip,
    Router,
};
use pnet::datalink;
use tokio::sync::{mpsc, Mutex};

#[tokio::main()]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let path = std::env::args().nth(1).unwrap_or_else(|| DefaultConfigPath.to_string());
    let config = RouterConfig::load(&path)?;

    let system: Vec<_> = datalink::interfaces()
        .into_iter()
        .filter(|iface| config.interfaces.is_empty() || config.interfaces.contains(&iface.name))
        .collect();
    let interfaces: Vec<Interface> = system.iter().map(Interface::from).collect();
    let router_id = config
        .router_id(&interfaces)
        .ok_or("no IPv4 address to take a router id from")?;

    let network = RawIpv4Layer::new(interfaces)?;
    let mut router = Router::new(router_id, Box::new(network));
    router.set_area_id(config.area_id);
    router.set_exclusions(config.exclusions);
    log!("router {} starting in area {}", hex2ip(router_id), config.area_id);
    let exclusions = router.exclusions().clone();
    let router = Arc::new(Mutex::new(router));

    let (tx, rx) = mpsc::channel(CaptureQueueSize);
    let mut handles = Vec::new();
    for iface in system
        .iter()
        .filter(|iface| !iface.is_loopback() && !exclusions.contains(&iface.index))
    {
        match CaptureOspfDaemon::new(iface, ospf_handler_maker(tx.clone())) {
            Ok(daemon) => handles.push(tokio::spawn(daemon.run_forever())),
            Err(e) => log_warning!("cannot capture on {}: {}", iface.name, e),
        }
    }
    drop(tx);
    handles.push(tokio::spawn(ReceiveDaemon::new(router.clone(), rx).run_forever()));
    handles.push(tokio::spawn(
        HelloDaemon::new(router, Duration::from_secs(config.hello_interval)).run_forever(),
    ));
    for hd in handles {
        hd.await?;
    }
    Ok(())
}
