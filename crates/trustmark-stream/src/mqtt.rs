//! MQTT stream.
//!
//! Construction validates the configuration and reads TLS material but does
//! not touch the network. `connect` opens a session, waits for the broker's
//! CONNACK and hands the event loop to a background task; `close` sends
//! DISCONNECT and waits for that task to drain.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{
    AsyncClient, Event, MqttOptions, Packet, QoS, TlsConfiguration, Transport,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use trustmark_core::{MqttConfig, MqttTlsConfig, StreamType};

use crate::envelope::Envelope;
use crate::error::{Result, StreamError};
use crate::traits::StreamProvider;

const KEEP_ALIVE: Duration = Duration::from_secs(30);
const REQUEST_CHANNEL_CAPACITY: usize = 16;

struct Session {
    client: AsyncClient,
    driver: JoinHandle<()>,
}

pub struct MqttStream {
    options: MqttOptions,
    qos: QoS,
    retain: bool,
    topics: Vec<String>,
    session: Mutex<Option<Session>>,
}

impl MqttStream {
    pub fn new(config: &MqttConfig) -> Result<Self> {
        if config.client_id.trim().is_empty() {
            return Err(StreamError::Configuration("mqtt client id is empty".into()));
        }
        if config.topics.is_empty() {
            return Err(StreamError::Configuration(
                "mqtt stream needs at least one topic".into(),
            ));
        }
        let qos = match config.qos {
            0 => QoS::AtMostOnce,
            1 => QoS::AtLeastOnce,
            2 => QoS::ExactlyOnce,
            n => {
                return Err(StreamError::Configuration(format!(
                    "unsupported mqtt qos {n}"
                )))
            }
        };

        let mut options = MqttOptions::new(
            config.client_id.as_str(),
            config.provider.host.as_str(),
            config.provider.port,
        );
        options.set_keep_alive(KEEP_ALIVE);
        options.set_clean_session(config.cleanness);
        if !config.user.is_empty() {
            options.set_credentials(config.user.as_str(), config.password.as_str());
        }
        match &config.tls {
            Some(tls) => {
                options.set_transport(tls_transport(tls)?);
            }
            None if config.provider.is_tls() => {
                return Err(StreamError::Configuration(format!(
                    "protocol {} requires tls material",
                    config.provider.protocol
                )));
            }
            None => {}
        }

        Ok(Self {
            options,
            qos,
            retain: config.is_retained,
            topics: config.topics.clone(),
            session: Mutex::new(None),
        })
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}

fn read_material(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| StreamError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn tls_transport(tls: &MqttTlsConfig) -> Result<Transport> {
    let ca = read_material(&tls.ca_path)?;
    let client_auth = match (&tls.cert_path, &tls.key_path) {
        (Some(cert), Some(key)) => Some((read_material(cert)?, read_material(key)?)),
        (None, None) => None,
        _ => {
            return Err(StreamError::Configuration(
                "mqtt client auth needs both a certificate and a key".into(),
            ))
        }
    };
    Ok(Transport::tls_with_config(TlsConfiguration::Simple {
        ca,
        alpn: None,
        client_auth,
    }))
}

#[async_trait]
impl StreamProvider for MqttStream {
    fn stream_type(&self) -> StreamType {
        StreamType::Mqtt
    }

    async fn connect(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        if session.is_some() {
            return Ok(());
        }

        let (client, mut eventloop) =
            AsyncClient::new(self.options.clone(), REQUEST_CHANNEL_CAPACITY);
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => break,
                Ok(_) => continue,
                Err(e) => return Err(StreamError::Transport(e.to_string())),
            }
        }
        let (host, port) = self.options.broker_address();
        info!(%host, port, "mqtt session established");

        let driver = tokio::spawn(async move {
            loop {
                if let Err(e) = eventloop.poll().await {
                    debug!(error = %e, "mqtt event loop finished");
                    break;
                }
            }
        });
        *session = Some(Session { client, driver });
        Ok(())
    }

    async fn send(&self, envelope: &Envelope) -> Result<()> {
        let payload = envelope.to_bytes()?;
        let session = self.session.lock().await;
        let session = session.as_ref().ok_or(StreamError::NotConnected)?;
        for topic in &self.topics {
            session
                .client
                .publish(topic.as_str(), self.qos, self.retain, payload.clone())
                .await
                .map_err(|e| StreamError::Transport(e.to_string()))?;
            debug!(topic = %topic, bytes = payload.len(), action = %envelope.action, "published");
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let Some(Session { client, driver }) = self.session.lock().await.take() else {
            return Ok(());
        };
        let disconnected = client
            .disconnect()
            .await
            .map_err(|e| StreamError::Transport(e.to_string()));
        // The event loop ends once every request handle is gone.
        drop(client);
        if let Err(e) = driver.await {
            warn!(error = %e, "mqtt event loop task failed");
        }
        disconnected
    }
}

impl Drop for MqttStream {
    fn drop(&mut self) {
        if let Some(session) = self.session.get_mut().take() {
            session.driver.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustmark_core::{AnnotationList, ServiceInfo};
    use crate::envelope::SdkAction;

    #[test]
    fn test_defaults_construct_without_network() {
        let stream = MqttStream::new(&MqttConfig::default()).unwrap();
        assert_eq!(stream.topics(), ["trustmark/annotations".to_string()]);
        assert_eq!(stream.stream_type(), StreamType::Mqtt);
    }

    #[test]
    fn test_rejects_bad_qos_and_empty_topics() {
        let cfg = MqttConfig {
            qos: 3,
            ..MqttConfig::default()
        };
        assert!(matches!(MqttStream::new(&cfg), Err(StreamError::Configuration(_))));

        let cfg = MqttConfig {
            topics: vec![],
            ..MqttConfig::default()
        };
        assert!(matches!(MqttStream::new(&cfg), Err(StreamError::Configuration(_))));
    }

    #[test]
    fn test_tls_protocol_without_material() {
        let cfg = MqttConfig {
            provider: ServiceInfo {
                protocol: "ssl".into(),
                port: 8883,
                ..ServiceInfo::default()
            },
            ..MqttConfig::default()
        };
        assert!(matches!(MqttStream::new(&cfg), Err(StreamError::Configuration(_))));
    }

    #[test]
    fn test_missing_ca_is_io_error() {
        let cfg = MqttConfig {
            tls: Some(MqttTlsConfig {
                ca_path: "/nonexistent/trustmark/ca.pem".into(),
                cert_path: None,
                key_path: None,
            }),
            ..MqttConfig::default()
        };
        assert!(matches!(MqttStream::new(&cfg), Err(StreamError::Io { .. })));
    }

    #[test]
    fn test_half_client_auth_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ca = dir.path().join("ca.pem");
        std::fs::write(&ca, b"ca").unwrap();
        let cfg = MqttConfig {
            tls: Some(MqttTlsConfig {
                ca_path: ca,
                cert_path: Some(dir.path().join("client.pem")),
                key_path: None,
            }),
            ..MqttConfig::default()
        };
        assert!(matches!(MqttStream::new(&cfg), Err(StreamError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_send_before_connect() {
        let stream = MqttStream::new(&MqttConfig::default()).unwrap();
        let err = stream
            .send(&Envelope::new(SdkAction::Create, AnnotationList::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, StreamError::NotConnected));
        // Closing a stream that never connected is a no-op.
        stream.close().await.unwrap();
    }
}
