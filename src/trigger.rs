use crate::config::ValidatedTarget;
use crate::wol;
use crate::wol::SendError;
use lazy_static::lazy_static;
use log::{debug, info, warn};
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    static ref WOL_SENDS: IntCounterVec = register_int_counter_vec!(
        "wakegate_wol_sends_total",
        "Magic packets attempted, by outcome.",
        &["result"]
    )
    .expect("wakegate_wol_sends_total registers once");
}

/// Something to do every time a request comes in. Implementations must not
/// fail the request: whatever goes wrong stays inside `fire`.
pub trait Trigger {
    fn fire(&self);
}

/// Wakes one machine per event with a unicast magic packet.
pub struct WakeTrigger {
    target: ValidatedTarget,
}

impl WakeTrigger {
    pub fn new(target: ValidatedTarget) -> Self {
        Self { target }
    }
}

impl Trigger for WakeTrigger {
    fn fire(&self) {
        let t = &self.target;
        let result = match wol::send(&t.mac, &t.host, t.port) {
            Ok(addr) => {
                debug!("sent magic packet for {} to {}", t.mac, addr);
                "ok"
            }
            Err(e) => {
                warn!("wake_on_lan: {}", e);
                match e {
                    SendError::Mac(_) => "mac",
                    SendError::Resolve { .. } | SendError::NoAddress { .. } => "resolve",
                    SendError::Transmit(_) | SendError::ShortWrite { .. } => "transmit",
                }
            }
        };
        WOL_SENDS.with_label_values(&[result]).inc();
    }
}

pub struct LogOnlyTrigger;

impl Trigger for LogOnlyTrigger {
    fn fire(&self) {
        info!("faking magic packet");
    }
}

#[cfg(test)]
mod tests {
    use crate::trigger::*;
    use std::net::UdpSocket;
    use std::time::Duration;

    fn sends(result: &str) -> u64 {
        WOL_SENDS.with_label_values(&[result]).get()
    }

    #[test]
    fn test_fire_sends_packet() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let trigger = WakeTrigger::new(ValidatedTarget {
            mac: "10:ff:e0:cf:e6:0e".to_string(),
            host: "127.0.0.1".to_string(),
            port: listener.local_addr().unwrap().port(),
        });
        let before = sends("ok");
        trigger.fire();

        let mut buf = [0u8; 512];
        let (len, _) = listener.recv_from(&mut buf).unwrap();
        assert_eq!(len, wol::PACKET_LEN);
        assert!(sends("ok") > before);
    }

    #[test]
    fn test_fire_swallows_errors() {
        let trigger = WakeTrigger::new(ValidatedTarget {
            mac: "not-a-mac".to_string(),
            host: "127.0.0.1".to_string(),
            port: 9,
        });
        let before = sends("mac");
        trigger.fire();
        assert!(sends("mac") > before);
    }
}
