//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Dueño del socket de escucha. El loop de `accept` corre en el thread que
//! llama a [`Server::run`] y solo encola cada conexión en el pool: un request
//! lento no frena la aceptación de nuevas conexiones. Con más de `n`
//! conexiones en curso, las que sobran esperan en la cola del pool.

use crate::config::Config;
use crate::error::StartupError;
use crate::server::handler::{self, HandlerContext};
use crate::workers::WorkerPool;
use socket2::{Domain, Protocol, SockRef, Socket, Type};
use std::io;
use std::net::{
    IpAddr, Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const LISTEN_BACKLOG: i32 = 128;
const WAKE_TIMEOUT: Duration = Duration::from_millis(200);

/// Servidor de archivos estáticos
pub struct Server {
    listener: Arc<TcpListener>,
    local_addr: SocketAddr,
    pool: WorkerPool,
    context: Arc<HandlerContext>,
    running: Arc<AtomicBool>,
    io_timeout: Option<Duration>,
}

/// Permite detener el servidor desde otro thread (ej: el handler de señales)
#[derive(Clone)]
pub struct ShutdownHandle {
    listener: Arc<TcpListener>,
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
}

impl Server {
    /// Crea el socket, hace bind y listen, y arranca el pool de workers
    ///
    /// Cualquier falla acá es fatal y se reporta con su tipo.
    pub fn bind(config: &Config) -> Result<Self, StartupError> {
        let address = resolve_address(&config.host, config.port)?;
        let listener = open_listener(address)?;
        let local_addr = listener.local_addr().map_err(StartupError::Listen)?;

        let pool = WorkerPool::new(config.workers).map_err(StartupError::WorkerSpawn)?;

        Ok(Self {
            listener: Arc::new(listener),
            local_addr,
            pool,
            context: Arc::new(HandlerContext::from_config(config)),
            running: Arc::new(AtomicBool::new(true)),
            io_timeout: config.read_timeout(),
        })
    }

    /// Dirección real de escucha (útil con puerto 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle para detener el servidor desde otro thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            listener: Arc::clone(&self.listener),
            local_addr: self.local_addr,
            running: Arc::clone(&self.running),
        }
    }

    /// `false` una vez que se pidió detener el servidor
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Loop de aceptación. Bloquea hasta que alguien llame a `stop`.
    pub fn run(&self) {
        info!(
            address = %self.local_addr,
            root = %self.context.document_root().display(),
            workers = self.pool.size(),
            "listening"
        );

        while self.is_running() {
            let accepted = self.listener.accept();

            // `stop` despierta a `accept` con un error o una conexión dummy
            if !self.is_running() {
                break;
            }

            match accepted {
                Ok((stream, peer)) => self.dispatch(stream, peer),
                Err(e) => warn!(error = %e, "accept failed, skipping"),
            }
        }

        info!("accept loop stopped");
    }

    /// Entrega la conexión a algún worker
    fn dispatch(&self, stream: TcpStream, peer: SocketAddr) {
        debug!(%peer, "connection accepted");

        if let Some(timeout) = self.io_timeout {
            let applied = stream
                .set_read_timeout(Some(timeout))
                .and_then(|_| stream.set_write_timeout(Some(timeout)));
            if let Err(e) = applied {
                warn!(%peer, error = %e, "could not set connection timeout");
            }
        }

        let context = Arc::clone(&self.context);
        let submitted = self.pool.submit(move || {
            let status = handler::handle_connection(stream, &context);
            debug!(%peer, status = status.as_u16(), "connection closed");
        });

        if let Err(e) = submitted {
            // El job vuelve en el error y se descarta: el stream se cierra
            warn!(%peer, error = %e, "connection dropped");
        }
    }

    /// Detiene el accept loop (no espera conexiones en curso)
    pub fn stop(&self) {
        self.shutdown_handle().stop();
    }

    /// Detiene el servidor y espera a que los workers terminen todo lo
    /// encolado
    pub fn shutdown(self) {
        self.stop();
        self.pool.shutdown();
    }
}

impl ShutdownHandle {
    /// Marca el servidor como detenido y cierra el socket de escucha para
    /// que el `accept` bloqueado retorne
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Err(e) = SockRef::from(&*self.listener).shutdown(Shutdown::Both) {
            debug!(error = %e, "listener shutdown failed");
        }

        // No todas las plataformas despiertan `accept` con shutdown
        let _ = TcpStream::connect_timeout(&wake_address(self.local_addr), WAKE_TIMEOUT);
    }

    /// `false` una vez que se pidió detener el servidor
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Resuelve `host:port` a la primera dirección disponible
fn resolve_address(host: &str, port: u16) -> Result<SocketAddr, StartupError> {
    let invalid = |source: io::Error| StartupError::InvalidAddress {
        address: format!("{}:{}", host, port),
        source,
    };

    (host, port)
        .to_socket_addrs()
        .map_err(invalid)?
        .next()
        .ok_or_else(|| invalid(io::Error::new(io::ErrorKind::NotFound, "no addresses found")))
}

/// socket → SO_REUSEADDR → bind → listen
fn open_listener(address: SocketAddr) -> Result<TcpListener, StartupError> {
    let socket = Socket::new(Domain::for_address(address), Type::STREAM, Some(Protocol::TCP))
        .map_err(StartupError::SocketCreation)?;

    // Un reinicio no falla por un socket viejo en TIME_WAIT
    socket
        .set_reuse_address(true)
        .map_err(StartupError::SocketCreation)?;

    socket
        .bind(&address.into())
        .map_err(|source| StartupError::Bind { address, source })?;

    socket.listen(LISTEN_BACKLOG).map_err(StartupError::Listen)?;

    Ok(socket.into())
}

/// Dirección a la que conectarse para despertar `accept`
fn wake_address(local: SocketAddr) -> SocketAddr {
    let ip = match local.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    SocketAddr::new(ip, local.port())
}
