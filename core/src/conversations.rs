//! Conversation API endpoints: conversations, members, events and users.
//!
//! Each method is a thin wrapper that picks a path and verb and hands off to
//! the namespace pipeline. Params are passed through untouched; the API, not
//! the client, decides whether a field is valid.

use crate::client::Namespace;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::params::Params;
use crate::response::Response;

const CONVERSATIONS: &str = "/v0.1/conversations";
const USERS: &str = "/v0.1/users";

#[derive(Debug, Clone)]
pub struct Conversations {
    ns: Namespace,
    events: Events,
    members: Members,
    users: Users,
}

impl Conversations {
    pub(crate) fn new(ns: Namespace) -> Self {
        Self {
            events: Events { ns: ns.clone() },
            members: Members { ns: ns.clone() },
            users: Users { ns: ns.clone() },
            ns,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    /// Create a conversation (`name`, `display_name`, `image_url`, `properties`).
    pub fn create(&self, params: &Params) -> Result<Response> {
        self.ns.request(HttpMethod::Post, CONVERSATIONS, Some(params))
    }

    /// List conversations (`page_size`, `order`, `cursor`).
    pub fn list(&self, params: Option<&Params>) -> Result<Response> {
        self.ns.request(HttpMethod::Get, CONVERSATIONS, params)
    }

    pub fn get(&self, id: &str) -> Result<Response> {
        self.ns.request(HttpMethod::Get, &format!("{CONVERSATIONS}/{id}"), None)
    }

    pub fn update(&self, id: &str, params: &Params) -> Result<Response> {
        self.ns.request(HttpMethod::Put, &format!("{CONVERSATIONS}/{id}"), Some(params))
    }

    pub fn delete(&self, id: &str) -> Result<Response> {
        self.ns.request(HttpMethod::Delete, &format!("{CONVERSATIONS}/{id}"), None)
    }

    /// Start or stop recording (`action`, `event_url`, `event_method`,
    /// `split`, `format`).
    pub fn record(&self, id: &str, params: &Params) -> Result<Response> {
        self.ns
            .request(HttpMethod::Put, &format!("/v1/conversations/{id}/record"), Some(params))
    }

    pub fn events(&self) -> &Events {
        &self.events
    }

    pub fn members(&self) -> &Members {
        &self.members
    }

    pub fn users(&self) -> &Users {
        &self.users
    }
}

/// Members of a conversation.
#[derive(Debug, Clone)]
pub struct Members {
    ns: Namespace,
}

impl Members {
    pub fn create(&self, conversation_id: &str, params: &Params) -> Result<Response> {
        self.ns
            .request(HttpMethod::Post, &members_path(conversation_id), Some(params))
    }

    pub fn list(&self, conversation_id: &str, params: Option<&Params>) -> Result<Response> {
        self.ns.request(HttpMethod::Get, &members_path(conversation_id), params)
    }

    pub fn get(&self, conversation_id: &str, member_id: &str) -> Result<Response> {
        let path = format!("{}/{member_id}", members_path(conversation_id));
        self.ns.request(HttpMethod::Get, &path, None)
    }

    pub fn update(&self, conversation_id: &str, member_id: &str, params: &Params) -> Result<Response> {
        let path = format!("{}/{member_id}", members_path(conversation_id));
        self.ns.request(HttpMethod::Put, &path, Some(params))
    }

    pub fn delete(&self, conversation_id: &str, member_id: &str) -> Result<Response> {
        let path = format!("{}/{member_id}", members_path(conversation_id));
        self.ns.request(HttpMethod::Delete, &path, None)
    }
}

fn members_path(conversation_id: &str) -> String {
    format!("{CONVERSATIONS}/{conversation_id}/members")
}

/// Events in a conversation.
#[derive(Debug, Clone)]
pub struct Events {
    ns: Namespace,
}

impl Events {
    pub fn create(&self, conversation_id: &str, params: &Params) -> Result<Response> {
        self.ns.request(HttpMethod::Post, &events_path(conversation_id), Some(params))
    }

    pub fn list(&self, conversation_id: &str, params: Option<&Params>) -> Result<Response> {
        self.ns.request(HttpMethod::Get, &events_path(conversation_id), params)
    }

    pub fn get(&self, conversation_id: &str, event_id: &str) -> Result<Response> {
        let path = format!("{}/{event_id}", events_path(conversation_id));
        self.ns.request(HttpMethod::Get, &path, None)
    }

    pub fn delete(&self, conversation_id: &str, event_id: &str) -> Result<Response> {
        let path = format!("{}/{event_id}", events_path(conversation_id));
        self.ns.request(HttpMethod::Delete, &path, None)
    }
}

fn events_path(conversation_id: &str) -> String {
    format!("{CONVERSATIONS}/{conversation_id}/events")
}

#[derive(Debug, Clone)]
pub struct Users {
    ns: Namespace,
}

impl Users {
    pub fn create(&self, params: &Params) -> Result<Response> {
        self.ns.request(HttpMethod::Post, USERS, Some(params))
    }

    pub fn list(&self, params: Option<&Params>) -> Result<Response> {
        self.ns.request(HttpMethod::Get, USERS, params)
    }

    pub fn get(&self, id: &str) -> Result<Response> {
        self.ns.request(HttpMethod::Get, &format!("{USERS}/{id}"), None)
    }

    pub fn update(&self, id: &str, params: &Params) -> Result<Response> {
        self.ns.request(HttpMethod::Put, &format!("{USERS}/{id}"), Some(params))
    }

    pub fn delete(&self, id: &str) -> Result<Response> {
        self.ns.request(HttpMethod::Delete, &format!("{USERS}/{id}"), None)
    }

    /// Conversations the user is a member of.
    pub fn conversations(&self, id: &str) -> Result<Response> {
        self.ns
            .request(HttpMethod::Get, &format!("{USERS}/{id}/conversations"), None)
    }
}
