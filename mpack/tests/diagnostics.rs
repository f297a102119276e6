use std::io;
use std::sync::{Arc, Mutex};

use mpack::{pack, pack_all, unpack, Value};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[test]
fn events_are_emitted() {
    let capture = Capture::default();
    let sink = capture.clone();
    let _guard = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("mpack=trace"))
        .with_writer(move || sink.clone())
        .with_ansi(false)
        .finish()
        .set_default();

    assert!(unpack(&[0x92u8, 0xc1]).is_err());
    pack_all(&[Value::Nil, Value::from(1u8)]).unwrap();
    pack(&Value::from("hello")).unwrap();

    let logged = capture.contents();
    assert!(logged.contains("failed to unpack value"), "{}", logged);
    assert!(logged.contains("position=1"), "{}", logged);
    assert!(logged.contains("packed values"), "{}", logged);
    assert!(logged.contains("count=2"), "{}", logged);
    assert!(logged.contains("packed value len=6"), "{}", logged);
}
