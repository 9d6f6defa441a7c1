// This file is part of Docket.
// SPDX-License-Identifier: AGPL-3.0-or-later

use argon2::password_hash::rand_core::{OsRng, RngCore};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

const SESSION_TOKEN_BYTES: usize = 18;

#[derive(Clone, Debug)]
struct SessionData {
    created_at: Instant,
    username: String,
}

/// In-memory session table behind a worker thread. All actix workers talk
/// to the same thread over a channel, so there is no shared-state locking
/// in the handlers. Sessions live until they expire, the user signs out,
/// or the process restarts.
#[derive(Clone)]
pub struct SessionStore {
    sender: mpsc::Sender<SessionCommand>,
}

enum SessionCommand {
    Issue {
        username: String,
        reply: mpsc::Sender<String>,
    },
    Lookup {
        token: String,
        reply: mpsc::Sender<Option<String>>,
    },
    Invalidate {
        token: String,
    },
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        let sender = start_session_worker(ttl);
        Self { sender }
    }

    #[cfg(test)]
    pub fn new_with_ttl(ttl: Duration) -> Self {
        Self::new(ttl)
    }

    pub fn issue(&self, username: &str) -> String {
        self.request(
            |reply| SessionCommand::Issue {
                username: username.to_string(),
                reply,
            },
            String::new(),
        )
    }

    pub fn lookup(&self, token: &str) -> Option<String> {
        self.request(
            |reply| SessionCommand::Lookup {
                token: token.to_string(),
                reply,
            },
            None,
        )
    }

    pub fn invalidate(&self, token: &str) {
        if self
            .sender
            .send(SessionCommand::Invalidate {
                token: token.to_string(),
            })
            .is_err()
        {
            log::error!("🚨 CRITICAL: SessionStore channel closed");
        }
    }

    fn request<T>(&self, build: impl FnOnce(mpsc::Sender<T>) -> SessionCommand, fallback: T) -> T {
        let (reply, receive) = mpsc::channel();
        if self.sender.send(build(reply)).is_err() {
            log::error!("🚨 CRITICAL: SessionStore channel closed");
            return fallback;
        }
        receive.recv().unwrap_or(fallback)
    }
}

fn start_session_worker(ttl: Duration) -> mpsc::Sender<SessionCommand> {
    let (sender, receiver) = mpsc::channel();
    let thread = thread::Builder::new().name("session-store".to_string());
    if let Err(err) = thread.spawn(move || run_session_worker(receiver, ttl)) {
        log::error!("SessionStore worker failed to start: {}", err);
    }
    sender
}

fn run_session_worker(receiver: mpsc::Receiver<SessionCommand>, ttl: Duration) {
    let mut sessions: HashMap<String, SessionData> = HashMap::new();
    while let Ok(command) = receiver.recv() {
        let now = Instant::now();
        cleanup_expired(&mut sessions, now, ttl);
        match command {
            SessionCommand::Issue { username, reply } => {
                let token = generate_token();
                sessions.insert(
                    token.clone(),
                    SessionData {
                        created_at: now,
                        username,
                    },
                );
                let _ = reply.send(token);
            }
            SessionCommand::Lookup { token, reply } => {
                let username = sessions
                    .get(&token)
                    .filter(|data| data.created_at.elapsed() < ttl)
                    .map(|data| data.username.clone());
                let _ = reply.send(username);
            }
            SessionCommand::Invalidate { token } => {
                sessions.remove(&token);
            }
        }
    }
}

fn cleanup_expired(sessions: &mut HashMap<String, SessionData>, now: Instant, ttl: Duration) {
    sessions.retain(|_, data| now.duration_since(data.created_at) < ttl);
}

fn generate_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    format!("ses_{}", URL_SAFE_NO_PAD.encode(bytes))
}
