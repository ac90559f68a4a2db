use ferrous_doh_domain::DomainError;
use ferrous_doh_infrastructure::dns::DnsServerHandler;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, error, info};

/// Largest UDP payload; nothing that arrives is ever cut short.
const MAX_DATAGRAM_SIZE: usize = 65_535;

/// Bind the UDP listener and serve until the socket fails.
pub async fn start_dns_server(
    listen_address: &str,
    handler: Arc<DnsServerHandler>,
) -> anyhow::Result<()> {
    let socket = UdpSocket::bind(listen_address)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind UDP listener on {}: {}", listen_address, e))?;

    info!(bind_address = %socket.local_addr()?, "DNS server ready");

    run_udp_listener(Arc::new(socket), handler).await?;
    Ok(())
}

/// Receive loop. Every datagram is handled on its own task.
pub async fn run_udp_listener(
    socket: Arc<UdpSocket>,
    handler: Arc<DnsServerHandler>,
) -> io::Result<()> {
    let mut recv_buf = vec![0u8; MAX_DATAGRAM_SIZE];

    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) if is_transient(&e) => {
                debug!(error = %e, "Transient UDP recv error");
                continue;
            }
            Err(e) => {
                error!(error = %e, "UDP recv error");
                return Err(e);
            }
        };

        let datagram: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = handler.clone();
        let socket = socket.clone();

        tokio::spawn(async move {
            if let Err(e) = serve_datagram(&handler, &socket, &datagram, from).await {
                error!(client = %from, category = e.category(), error = %e, "Failed to send reply");
            }
        });
    }
}

/// Handle one datagram and send its reply, if any. A failure only affects
/// this datagram.
async fn serve_datagram(
    handler: &DnsServerHandler,
    socket: &UdpSocket,
    datagram: &[u8],
    from: SocketAddr,
) -> Result<(), DomainError> {
    match handler.handle_raw_udp(datagram).await {
        Some(reply) => send_reply(socket, &reply, from).await,
        None => Ok(()),
    }
}

async fn send_reply(socket: &UdpSocket, reply: &[u8], to: SocketAddr) -> Result<(), DomainError> {
    socket
        .send_to(reply, to)
        .await
        .map(|_| ())
        .map_err(|e| DomainError::WriteFailed(format!("{}: {}", to, e)))
}

// ICMP port-unreachable from an earlier reply surfaces on Linux as a recv error.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionRefused
    )
}
