use std::collections::HashMap;
use std::fmt::Write;

use serde::Deserialize;

/// Session-wide caps. `None` leaves a counter unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionLimits {
    pub total_interactions: Option<u32>,
    pub successful_interactions: Option<u32>,
    pub likes: Option<u32>,
    pub follows: Option<u32>,
    pub watched_stories: Option<u32>,
    pub comments: Option<u32>,
    pub private_messages: Option<u32>,
    pub crashes: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitScope {
    /// Activity limits and action limits together.
    All,
    /// Total and successful interactions, plus crashes.
    Activity,
    /// Likes, follows, stories, comments and messages.
    Actions,
    Crashes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitStatus {
    pub active_reached: bool,
    /// Human readable counter summary, e.g. `likes 3/10, follows 1/-`.
    pub detail: String,
    pub actions_reached: bool,
}

impl LimitStatus {
    pub fn any_reached(&self) -> bool {
        self.active_reached || self.actions_reached
    }
}

/// What one interaction did, as reported by the interaction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionRecord {
    pub succeeded: bool,
    pub likes: u32,
    pub followed: bool,
    pub watched_stories: u32,
    pub commented: bool,
    pub messaged: bool,
}

/// In-memory counters of the running session, checked against [`SessionLimits`].
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    my_username: Option<String>,
    limits: SessionLimits,
    total_interactions: u32,
    successful_interactions: u32,
    likes: u32,
    follows: u32,
    watched_stories: u32,
    comments: u32,
    private_messages: u32,
    crashes: u32,
    follows_by_source: HashMap<String, u32>,
    successful_by_source: HashMap<String, u32>,
}

impl SessionState {
    pub fn new(limits: SessionLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.my_username = Some(username.into());
        self
    }

    pub fn my_username(&self) -> Option<&str> {
        self.my_username.as_deref()
    }

    pub fn record_interaction(&mut self, source: &str, record: InteractionRecord) {
        self.total_interactions += 1;
        if record.succeeded {
            self.successful_interactions += 1;
            *self
                .successful_by_source
                .entry(source.to_string())
                .or_default() += 1;
        }
        self.likes += record.likes;
        self.watched_stories += record.watched_stories;
        if record.followed {
            self.follows += 1;
            *self.follows_by_source.entry(source.to_string()).or_default() += 1;
        }
        if record.commented {
            self.comments += 1;
        }
        if record.messaged {
            self.private_messages += 1;
        }
    }

    pub fn record_crash(&mut self) {
        self.crashes += 1;
    }

    pub fn crashes(&self) -> u32 {
        self.crashes
    }

    pub fn total_interactions(&self) -> u32 {
        self.total_interactions
    }

    pub fn follows_for_source(&self, source: &str) -> u32 {
        self.follows_by_source.get(source).copied().unwrap_or(0)
    }

    pub fn successful_for_source(&self, source: &str) -> u32 {
        self.successful_by_source.get(source).copied().unwrap_or(0)
    }

    /// Evaluate the session counters against the configured limits.
    ///
    /// Activity is reached as soon as any activity counter hits its cap.
    /// Actions are reached only when every action kind is capped and
    /// exhausted, since any uncapped action can still be performed.
    pub fn check_limits(&self, scope: LimitScope) -> LimitStatus {
        let limits = &self.limits;
        let interactions = reached(self.total_interactions, limits.total_interactions);
        let successful = reached(self.successful_interactions, limits.successful_interactions);
        let crashes = reached(self.crashes, limits.crashes);

        let actions = [
            ("likes", self.likes, limits.likes),
            ("follows", self.follows, limits.follows),
            ("stories", self.watched_stories, limits.watched_stories),
            ("comments", self.comments, limits.comments),
            ("messages", self.private_messages, limits.private_messages),
        ];
        let actions_reached = actions
            .iter()
            .all(|(_, count, limit)| reached(*count, *limit));

        let mut detail = String::new();
        let mut push = |name: &str, count: u32, limit: Option<u32>| {
            if !detail.is_empty() {
                detail.push_str(", ");
            }
            match limit {
                Some(limit) => {
                    let _ = write!(detail, "{name} {count}/{limit}");
                }
                None => {
                    let _ = write!(detail, "{name} {count}/-");
                }
            }
        };

        let (active_reached, actions_reached) = match scope {
            LimitScope::All | LimitScope::Activity => {
                push("interactions", self.total_interactions, limits.total_interactions);
                push(
                    "successful",
                    self.successful_interactions,
                    limits.successful_interactions,
                );
                push("crashes", self.crashes, limits.crashes);
                let active = interactions || successful || crashes;
                if scope == LimitScope::Activity {
                    (active, false)
                } else {
                    for (name, count, limit) in actions {
                        push(name, count, limit);
                    }
                    (active, actions_reached)
                }
            }
            LimitScope::Actions => {
                for (name, count, limit) in actions {
                    push(name, count, limit);
                }
                (false, actions_reached)
            }
            LimitScope::Crashes => {
                push("crashes", self.crashes, limits.crashes);
                (crashes, false)
            }
        };

        LimitStatus {
            active_reached,
            detail,
            actions_reached,
        }
    }
}

fn reached(count: u32, limit: Option<u32>) -> bool {
    limit.is_some_and(|limit| count >= limit)
}
