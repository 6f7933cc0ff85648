//! Gemini protocol client.
//!
//! One request per TLS connection: the client sends `<url>\r\n`, the server
//! answers `<status> <meta>\r\n` followed by the body for `2x` statuses.
//! Gemini servers commonly use self-signed certificates, so certificates are
//! not checked against a CA store; handshake signatures are still verified.

use std::future::Future;
use std::sync::Arc;

use retro_config::FetchConfig;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{CryptoProvider, verify_tls12_signature, verify_tls13_signature};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{DigitallySignedStruct, SignatureScheme};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpStream;
use tokio::time::{Instant, timeout_at};
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;
use url::Url;

use crate::error::FetchError;
use crate::source::{Fetcher, LineSource};

pub const DEFAULT_PORT: u16 = 1965;

/// Longest header: two status digits, a space, 1024 bytes of meta, CRLF.
const MAX_HEADER_BYTES: u64 = 1029;

/// Parsed response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeader {
    pub status: u8,
    pub meta: String,
}

impl ResponseHeader {
    /// Parse a header line, with or without its line terminator.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::MalformedHeader` unless the line starts with a
    /// two-digit status.
    pub fn parse(line: &str) -> Result<Self, FetchError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (status, meta) = line.split_once(' ').unwrap_or((line, ""));
        if status.len() != 2 || !status.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FetchError::MalformedHeader(line.to_string()));
        }
        let status = status
            .parse()
            .map_err(|_| FetchError::MalformedHeader(line.to_string()))?;
        Ok(Self {
            status,
            meta: meta.trim().to_string(),
        })
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status / 10 == 2
    }

    #[must_use]
    pub const fn is_redirect(&self) -> bool {
        self.status / 10 == 3
    }
}

/// Fetches `gemini://` pages over TLS.
#[derive(Clone)]
pub struct GeminiFetcher {
    connector: TlsConnector,
    config: FetchConfig,
}

impl std::fmt::Debug for GeminiFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiFetcher {
    /// # Errors
    ///
    /// Returns `FetchError::Tls` if no TLS protocol version can be configured.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let tls = rustls::ClientConfig::builder_with_provider(Arc::clone(&provider))
            .with_safe_default_protocol_versions()?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate { provider }))
            .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(tls)),
            config: config.clone(),
        })
    }

    async fn connect(&self, url: Url) -> Result<TlsStream<TcpStream>, FetchError> {
        if url.scheme() != "gemini" {
            return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
        }
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or(FetchError::MissingHost)?
            .trim_start_matches('[')
            .trim_end_matches(']');
        let port = url.port().unwrap_or(DEFAULT_PORT);

        let tcp = TcpStream::connect((host, port)).await?;
        let server_name = ServerName::try_from(host.to_string())?;
        Ok(self.connector.connect(server_name, tcp).await?)
    }
}

impl Fetcher for GeminiFetcher {
    type Source = GeminiBody;

    async fn request(&self, url: &str) -> Result<GeminiBody, FetchError> {
        let deadline = Instant::now() + self.config.timeout();
        let url = Url::parse(url)?;
        follow(url, &self.config, deadline, |target| self.connect(target)).await
    }
}

/// Send the request line on `stream` and read the response header.
async fn exchange<S>(
    stream: impl Future<Output = Result<S, FetchError>>,
    url: &Url,
) -> Result<(ResponseHeader, BufReader<S>), FetchError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut stream = stream.await?;
    stream.write_all(format!("{url}\r\n").as_bytes()).await?;
    stream.flush().await?;

    let mut reader = BufReader::new(stream);
    let mut header = Vec::new();
    (&mut reader)
        .take(MAX_HEADER_BYTES)
        .read_until(b'\n', &mut header)
        .await?;
    let header = ResponseHeader::parse(&String::from_utf8_lossy(&header))?;
    Ok((header, reader))
}

/// Request `url` over streams from `connect`, following redirects, until a
/// success response or `deadline`.
async fn follow<S, C, Fut>(
    url: Url,
    config: &FetchConfig,
    deadline: Instant,
    mut connect: C,
) -> Result<GeminiBody<S>, FetchError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    C: FnMut(Url) -> Fut,
    Fut: Future<Output = Result<S, FetchError>>,
{
    let mut current = url;

    for _ in 0..=config.max_redirects {
        let (header, reader) = timeout_at(deadline, exchange(connect(current.clone()), &current))
            .await
            .map_err(|_| FetchError::Timeout)??;

        if header.is_success() {
            tracing::debug!(url = %current, mime = %header.meta, "page fetched");
            return Ok(GeminiBody {
                reader,
                deadline,
                remaining: config.max_response_bytes,
                limit: config.max_response_bytes,
            });
        }

        let mut stream = reader.into_inner();
        let _ = stream.shutdown().await;

        if !header.is_redirect() {
            return Err(FetchError::Status {
                status: header.status,
                meta: header.meta,
            });
        }
        let target = current.join(&header.meta)?;
        tracing::debug!(from = %current, to = %target, "following redirect");
        current = target;
    }

    Err(FetchError::TooManyRedirects(config.max_redirects))
}

/// Body of a successful Gemini response.
pub struct GeminiBody<S = TlsStream<TcpStream>> {
    reader: BufReader<S>,
    deadline: Instant,
    remaining: u64,
    limit: u64,
}

impl<S> LineSource for GeminiBody<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn next_line(&mut self) -> Result<Option<Vec<u8>>, FetchError> {
        let deadline = self.deadline;
        if self.remaining == 0 {
            let rest = timeout_at(deadline, self.reader.fill_buf())
                .await
                .map_err(|_| FetchError::Timeout)??;
            return if rest.is_empty() {
                Ok(None)
            } else {
                Err(FetchError::TooLarge(self.limit))
            };
        }

        let mut line = Vec::new();
        let read = timeout_at(
            deadline,
            (&mut self.reader)
                .take(self.remaining)
                .read_until(b'\n', &mut line),
        )
        .await
        .map_err(|_| FetchError::Timeout)??;

        if read == 0 {
            return Ok(None);
        }
        self.remaining = self
            .remaining
            .saturating_sub(u64::try_from(read).unwrap_or(u64::MAX));
        Ok(Some(line))
    }

    async fn discard(self) {
        let mut stream = self.reader.into_inner();
        let _ = stream.shutdown().await;
    }
}

/// Accepts any server certificate while still checking that the server
/// holds the key for it.
#[derive(Debug)]
struct AcceptAnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
