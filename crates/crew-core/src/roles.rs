//! Role vocabulary and the static role registry.
//!
//! The six roles are a closed enum, so descriptor lookup is total. String keys
//! coming from the command line go through [`parse_role_list`], which keeps the
//! recognised roles and reports the rest.

use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::{CrewError, CrewResult};

/// The six agent roles, declared in canonical task order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Architect,
    Coder,
    Tester,
    Reviewer,
    Researcher,
    Docwriter,
}

impl Role {
    /// Every role in canonical order.
    pub const ALL: [Role; 6] = [
        Role::Architect,
        Role::Coder,
        Role::Tester,
        Role::Reviewer,
        Role::Researcher,
        Role::Docwriter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Architect => "architect",
            Role::Coder => "coder",
            Role::Tester => "tester",
            Role::Reviewer => "reviewer",
            Role::Researcher => "researcher",
            Role::Docwriter => "docwriter",
        }
    }

    /// Static descriptor for this role.
    pub fn descriptor(self) -> &'static RoleDescriptor {
        &REGISTRY[self as usize]
    }

    /// Only the architect may hand sub-work to other agents.
    pub fn allows_delegation(self) -> bool {
        matches!(self, Role::Architect)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CrewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == key)
            .ok_or_else(|| CrewError::UnknownRole(key.to_string()))
    }
}

/// Immutable description of a role: who the agent is and which model it prefers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDescriptor {
    pub role: Role,
    pub title: &'static str,
    pub objective: &'static str,
    pub persona: &'static str,
    pub preferred_model: &'static str,
}

// Indexed by `Role as usize`; order must follow the enum declaration.
static REGISTRY: [RoleDescriptor; 6] = [
    RoleDescriptor {
        role: Role::Architect,
        title: "Software Architect",
        objective: "Design scalable, maintainable, and elegant system architectures",
        persona: "You are a seasoned software architect with 15+ years experience. \
                  You've designed systems handling millions of users. You think in terms of \
                  patterns, trade-offs, scalability, and long-term maintainability. \
                  You prefer pragmatic solutions over theoretical perfection.",
        preferred_model: "llama3.1:70b",
    },
    RoleDescriptor {
        role: Role::Coder,
        title: "Senior Developer",
        objective: "Write clean, efficient, well-tested code that solves problems elegantly",
        persona: "You are a senior developer with deep expertise in Python, TypeScript, \
                  React, and system programming. You write code that is readable, maintainable, \
                  and follows best practices. You always consider edge cases and error handling.",
        preferred_model: "qwen2.5-coder:32b",
    },
    RoleDescriptor {
        role: Role::Tester,
        title: "QA Engineer",
        objective: "Ensure code quality through comprehensive testing and edge case coverage",
        persona: "You are a QA engineer who believes in test-driven development. \
                  You think about edge cases others miss. You write tests that catch bugs \
                  before they reach production. You know Jest, pytest, and testing patterns.",
        preferred_model: "deepseek-coder-v2:16b",
    },
    RoleDescriptor {
        role: Role::Reviewer,
        title: "Code Reviewer",
        objective: "Ensure code quality, security, and adherence to best practices",
        persona: "You are a meticulous code reviewer focused on security and quality. \
                  You catch potential bugs, security vulnerabilities, and suggest improvements. \
                  You know OWASP, SOLID principles, and clean code practices.",
        preferred_model: "qwen2.5-coder:32b",
    },
    RoleDescriptor {
        role: Role::Researcher,
        title: "Technical Researcher",
        objective: "Find relevant documentation, examples, and best practices",
        persona: "You are a technical researcher who knows where to find information. \
                  You can quickly locate documentation, examples, and solutions. \
                  You synthesize information from multiple sources into actionable insights.",
        preferred_model: "deepseek-coder-v2:16b",
    },
    RoleDescriptor {
        role: Role::Docwriter,
        title: "Technical Writer",
        objective: "Create clear, comprehensive documentation that helps users succeed",
        persona: "You are a technical writer who makes complex things simple. \
                  You write documentation that is clear, well-structured, and helpful. \
                  You know Markdown, JSDoc, docstrings, and documentation best practices.",
        preferred_model: "deepseek-coder-v2:16b",
    },
];

/// Look up a descriptor by role key.
///
/// Returns [`CrewError::UnknownRole`] for keys outside the six roles.
pub fn describe(key: &str) -> CrewResult<&'static RoleDescriptor> {
    key.parse::<Role>().map(Role::descriptor)
}

/// Roles parsed from a comma-separated list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSelection {
    /// Recognised roles, in the order first listed, without duplicates.
    pub roles: Vec<Role>,
    /// Names that did not match any role.
    pub unknown: Vec<String>,
}

impl RoleSelection {
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Parse a comma-separated role list such as `"tester, architect"`.
///
/// Entries are trimmed and matched exactly against the lowercase keys. Unknown names are
/// logged as warnings and skipped; empty entries are ignored.
pub fn parse_role_list(list: &str) -> RoleSelection {
    let mut selection = RoleSelection::default();

    for entry in list.split(',').map(str::trim) {
        if entry.is_empty() {
            continue;
        }
        match entry.parse::<Role>() {
            Ok(role) if selection.contains(role) => {
                debug!(role = %role, "duplicate agent ignored");
            }
            Ok(role) => selection.roles.push(role),
            Err(_) => {
                warn!(agent = %entry, "unknown agent, skipping it and its task");
                selection.unknown.push(entry.to_string());
            }
        }
    }

    selection
}
