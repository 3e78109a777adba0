use std::net::UdpSocket;

/// Best-effort LAN address for the startup banner. Opens a UDP socket toward
/// a public address to learn the preferred outbound interface; nothing is
/// actually sent.
pub fn local_ip() -> String {
    fn probe() -> Option<String> {
        let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
        socket.connect("8.8.8.8:80").ok()?;
        Some(socket.local_addr().ok()?.ip().to_string())
    }
    probe().unwrap_or_else(|| "localhost".to_owned())
}
