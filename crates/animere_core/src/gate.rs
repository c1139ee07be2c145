//! Initialization gate
//!
//! Deciding whether the engine should run at all is a single capability:
//! given a snapshot of the host [`Environment`], answer yes or no. The
//! default [`EnvironmentGate`] declines when the user asked for reduced
//! motion or when the agent looks like a crawler. Hosts that want their own
//! rule pass any `Fn(&Environment) -> bool` instead.

use std::sync::OnceLock;

use regex::Regex;

/// Facts about the hosting environment that gates care about
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    /// `prefers-reduced-motion: reduce` is set
    pub prefers_reduced_motion: bool,
    /// The agent supports scrolling at all
    pub supports_scroll: bool,
    /// The agent's user-agent string
    pub user_agent: String,
}

impl Environment {
    /// An interactive browser with motion enabled
    pub fn interactive() -> Self {
        Self {
            prefers_reduced_motion: false,
            supports_scroll: true,
            user_agent: String::new(),
        }
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.prefers_reduced_motion = reduced;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_scroll_support(mut self, supported: bool) -> Self {
        self.supports_scroll = supported;
        self
    }
}

/// Decides whether the engine initializes
pub trait InitGate {
    fn should_init(&self, env: &Environment) -> bool;
}

impl<F> InitGate for F
where
    F: Fn(&Environment) -> bool,
{
    fn should_init(&self, env: &Environment) -> bool {
        self(env)
    }
}

/// Default gate: no reduced motion, no crawlers
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvironmentGate;

impl InitGate for EnvironmentGate {
    fn should_init(&self, env: &Environment) -> bool {
        !env.prefers_reduced_motion && !is_crawler(env)
    }
}

/// Gate that always initializes
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysInit;

impl InitGate for AlwaysInit {
    fn should_init(&self, _env: &Environment) -> bool {
        true
    }
}

fn crawler_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)(gle|ing|ro)bot|crawl|spider").expect("crawler pattern is valid")
    })
}

/// Agents that cannot scroll or identify as bots
pub fn is_crawler(env: &Environment) -> bool {
    !env.supports_scroll || crawler_pattern().is_match(&env.user_agent)
}
