//! Active SMTP probe.
//!
//! [`probe_address`] resolves the target domain's exchangers, dials the
//! best-preference host on port 25 and walks the dialogue
//! greeting → `EHLO` → `MAIL FROM` → `RCPT TO`. The `RCPT TO` reply alone
//! decides the verdict: code 250 means deliverable, anything else does not.
//! No message is ever sent, and the connection is closed on every exit path.
//!
//! Only the first exchanger is contacted; there is no fallback to
//! lower-priority hosts on connection failure.

mod error;
mod options;
mod session;
mod types;

pub use error::ProbeError;
pub use options::ProbeOptions;
pub use types::{ProbeOutcome, ProbeReport, ProbeStage, SmtpEvent, SmtpReply};

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};

use tracing::{debug, warn};
use trust_dns_resolver::Resolver;

use crate::address::Address;
use crate::mx::{self, LookupMx, MxRecord};
use session::SmtpSession;
use types::ProbeStage as Stage;

pub fn probe_address(
    address: &Address,
    options: &ProbeOptions,
) -> Result<ProbeReport, ProbeError> {
    let resolver = Resolver::from_system_conf().map_err(ProbeError::resolver_init)?;
    probe_with_resolver(&resolver, address, options)
}

pub(crate) fn probe_with_resolver<R: LookupMx>(
    resolver: &R,
    address: &Address,
    options: &ProbeOptions,
) -> Result<ProbeReport, ProbeError> {
    let mut events = Vec::new();

    let status = match mx::resolve_with(resolver, &address.ascii_domain) {
        Ok(status) => status,
        Err(err) => {
            warn!(domain = %address.ascii_domain, error = %err, "MX resolution failed, treating as no mail server");
            return Ok(ProbeReport {
                email: address.to_string(),
                exchange: None,
                outcome: ProbeOutcome::NoMailServer,
                events,
            });
        }
    };

    let Some(record) = status.preferred() else {
        debug!(domain = %address.ascii_domain, "domain publishes no MX records");
        return Ok(ProbeReport {
            email: address.to_string(),
            exchange: None,
            outcome: ProbeOutcome::NoMailServer,
            events,
        });
    };

    let outcome = drive(record, address, options, &mut events);
    Ok(ProbeReport {
        email: address.to_string(),
        exchange: Some(record.exchange.clone()),
        outcome,
        events,
    })
}

fn drive(
    record: &MxRecord,
    address: &Address,
    options: &ProbeOptions,
    events: &mut Vec<SmtpEvent>,
) -> ProbeOutcome {
    let addrs = match socket_addrs(&record.exchange, options.port) {
        Ok(addrs) if !addrs.is_empty() => addrs,
        Ok(_) => {
            return ProbeOutcome::Unreachable {
                message: format!("no socket addresses resolved for {}", record.exchange),
            };
        }
        Err(err) => {
            events.push(SmtpEvent::Error {
                stage: Stage::Connect,
                message: err.to_string(),
            });
            return ProbeOutcome::Unreachable {
                message: err.to_string(),
            };
        }
    };

    let mut session =
        match SmtpSession::connect(&addrs, options.connect_timeout, options.command_timeout) {
            Ok(session) => session,
            Err(err) => {
                events.push(SmtpEvent::Error {
                    stage: Stage::Connect,
                    message: err.to_string(),
                });
                warn!(exchange = %record.exchange, error = %err, "connection attempt failed");
                return fail(Stage::Connect, &err);
            }
        };

    // The greeting, EHLO and MAIL FROM replies are recorded but their codes
    // are deliberately not checked; only the RCPT TO reply decides.
    if let Err(outcome) = receive(&mut session, Stage::Greeting, events) {
        return outcome;
    }

    let ehlo = format!("EHLO {}", options.helo_name(&address.ascii_domain));
    if let Err(outcome) = exchange(&mut session, Stage::Ehlo, &ehlo, events) {
        return outcome;
    }

    let mail_from = format!("MAIL FROM:<{}>", options.envelope_sender(&address.ascii_domain));
    if let Err(outcome) = exchange(&mut session, Stage::MailFrom, &mail_from, events) {
        return outcome;
    }

    let rcpt_to = format!("RCPT TO:<{address}>");
    let reply = match exchange(&mut session, Stage::RcptTo, &rcpt_to, events) {
        Ok(reply) => reply,
        Err(outcome) => return outcome,
    };

    // No QUIT: dropping the session here closes the socket (abrupt close,
    // kept on purpose).
    if reply.accepts_recipient() {
        ProbeOutcome::Accepted { reply }
    } else {
        ProbeOutcome::Rejected { reply }
    }
}

fn exchange(
    session: &mut SmtpSession,
    stage: ProbeStage,
    command: &str,
    events: &mut Vec<SmtpEvent>,
) -> Result<SmtpReply, ProbeOutcome> {
    debug!(%stage, command, "sending");
    events.push(SmtpEvent::Sent {
        stage,
        command: command.to_string(),
    });
    if let Err(err) = session.send_command(command) {
        events.push(SmtpEvent::Error {
            stage,
            message: err.to_string(),
        });
        warn!(%stage, error = %err, "write failed");
        return Err(fail(stage, &err));
    }
    receive(session, stage, events)
}

fn receive(
    session: &mut SmtpSession,
    stage: ProbeStage,
    events: &mut Vec<SmtpEvent>,
) -> Result<SmtpReply, ProbeOutcome> {
    match session.read_reply() {
        Ok(reply) => {
            debug!(%stage, code = reply.code, "received");
            events.push(SmtpEvent::Received {
                stage,
                reply: reply.clone(),
            });
            Ok(reply)
        }
        Err(err) => {
            events.push(SmtpEvent::Error {
                stage,
                message: err.to_string(),
            });
            warn!(%stage, error = %err, "read failed");
            Err(fail(stage, &err))
        }
    }
}

fn fail(stage: ProbeStage, err: &io::Error) -> ProbeOutcome {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ProbeOutcome::TimedOut { stage },
        _ if matches!(stage, Stage::Connect) => ProbeOutcome::Unreachable {
            message: err.to_string(),
        },
        _ => ProbeOutcome::ProtocolError {
            stage,
            message: err.to_string(),
        },
    }
}

fn socket_addrs(exchange: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
    format!("{exchange}:{port}")
        .to_socket_addrs()
        .map(|iter| iter.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mx::tests::StubResolver;
    use std::io::{BufRead, BufReader, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;
    use trust_dns_resolver::error::ResolveError;

    fn spawn_mock_server(
        script: Vec<(&'static str, &'static str)>,
    ) -> (u16, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let port = listener.local_addr().expect("addr").port();
        let (ready_tx, ready_rx) = mpsc::channel();
        let handle = thread::spawn(move || {
            ready_tx.send(()).ok();
            if let Ok((mut stream, _)) = listener.accept() {
                let _ = handle_session(&mut stream, script);
            }
        });
        ready_rx.recv().expect("server ready");
        (port, handle)
    }

    fn handle_session(
        stream: &mut TcpStream,
        script: Vec<(&'static str, &'static str)>,
    ) -> io::Result<()> {
        let mut reader = BufReader::new(stream.try_clone()?);
        stream.write_all(b"220 mock.smtp.test ESMTP\r\n")?;
        stream.flush()?;
        for (expected, response) in script {
            let mut line = String::new();
            reader.read_line(&mut line)?;
            assert!(
                line.starts_with(expected),
                "expected command starting with '{expected}', got '{line}'"
            );
            stream.write_all(response.as_bytes())?;
            stream.flush()?;
        }
        Ok(())
    }

    fn target(s: &str) -> Address {
        Address::parse(s).expect("test address")
    }

    #[test]
    fn no_mx_records_means_negative_verdict_without_dialing() {
        let resolver = StubResolver::new(|_| Ok(Vec::new()));
        let report =
            probe_with_resolver(&resolver, &target("user@example.com"), &ProbeOptions::default())
                .expect("report");
        assert!(matches!(report.outcome, ProbeOutcome::NoMailServer));
        assert!(!report.is_deliverable());
        assert!(report.exchange.is_none());
        // no connection attempt means an empty transcript
        assert!(report.events.is_empty());
    }

    #[test]
    fn mx_resolution_error_means_negative_verdict() {
        let resolver = StubResolver::new(|_| Err(ResolveError::from("stubbed lookup failure")));
        let report =
            probe_with_resolver(&resolver, &target("user@example.com"), &ProbeOptions::default())
                .expect("report");
        assert!(matches!(report.outcome, ProbeOutcome::NoMailServer));
        assert!(!report.is_deliverable());
    }

    #[test]
    fn timeouts_are_a_distinct_outcome() {
        let timed_out = io::Error::from(io::ErrorKind::TimedOut);
        assert!(matches!(
            fail(Stage::Greeting, &timed_out),
            ProbeOutcome::TimedOut {
                stage: Stage::Greeting
            }
        ));
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert!(matches!(
            fail(Stage::Connect, &refused),
            ProbeOutcome::Unreachable { .. }
        ));
        assert!(matches!(
            fail(Stage::RcptTo, &io::Error::from(io::ErrorKind::BrokenPipe)),
            ProbeOutcome::ProtocolError {
                stage: Stage::RcptTo,
                ..
            }
        ));
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn accepted_rcpt_is_deliverable() {
        let (port, handle) = spawn_mock_server(vec![
            ("EHLO", "250-mock.example\r\n250 STARTTLS\r\n"),
            ("MAIL FROM:", "250 2.1.0 Ok\r\n"),
            ("RCPT TO:<user@example.com>", "250 2.1.5 Ok\r\n"),
        ]);
        let resolver = StubResolver::new(|_| Ok(vec![MxRecord::new(10, "127.0.0.1")]));
        let options = ProbeOptions {
            port,
            ..ProbeOptions::default()
        };
        let report =
            probe_with_resolver(&resolver, &target("user@example.com"), &options).expect("report");
        assert!(report.is_deliverable());
        assert!(matches!(report.outcome, ProbeOutcome::Accepted { .. }));
        assert_eq!(report.exchange.as_deref(), Some("127.0.0.1"));
        handle.join().expect("server thread");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn rejected_rcpt_is_not_deliverable() {
        let (port, handle) = spawn_mock_server(vec![
            ("EHLO", "250 mock.example\r\n"),
            ("MAIL FROM:", "250 2.1.0 Ok\r\n"),
            ("RCPT TO:", "550 5.1.1 No such user\r\n"),
        ]);
        let resolver = StubResolver::new(|_| Ok(vec![MxRecord::new(10, "127.0.0.1")]));
        let options = ProbeOptions {
            port,
            ..ProbeOptions::default()
        };
        let report =
            probe_with_resolver(&resolver, &target("user@example.com"), &options).expect("report");
        assert!(!report.is_deliverable());
        match &report.outcome {
            ProbeOutcome::Rejected { reply } => assert_eq!(reply.code, 550),
            other => panic!("unexpected outcome: {other:?}"),
        }
        handle.join().expect("server thread");
    }

    #[test]
    #[ignore = "requires loopback TCP binding"]
    fn only_the_best_preference_exchange_is_dialed() {
        let (port, handle) = spawn_mock_server(vec![
            ("EHLO", "250 mock.example\r\n"),
            ("MAIL FROM:", "250 Ok\r\n"),
            ("RCPT TO:", "250 Ok\r\n"),
        ]);
        // The bogus secondary would fail to resolve if it were ever dialed.
        let resolver = StubResolver::new(|_| {
            Ok(vec![
                MxRecord::new(50, "does-not-resolve.invalid"),
                MxRecord::new(10, "127.0.0.1"),
            ])
        });
        let options = ProbeOptions {
            port,
            ..ProbeOptions::default()
        };
        let report =
            probe_with_resolver(&resolver, &target("user@example.com"), &options).expect("report");
        assert_eq!(report.exchange.as_deref(), Some("127.0.0.1"));
        assert!(report.is_deliverable());
        handle.join().expect("server thread");
    }
}
