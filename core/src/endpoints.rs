//! API paths, relative to the client's base URL.
//!
//! Fixed paths are constants; paths that embed an identifier are functions.

pub mod users {
    pub const LIST: &str = "/users";
    pub const CREATE: &str = "/users";

    pub fn detail(id: &str) -> String {
        format!("/users/{id}")
    }

    pub fn update(id: &str) -> String {
        detail(id)
    }

    pub fn delete(id: &str) -> String {
        detail(id)
    }
}

pub mod posts {
    pub const LIST: &str = "/posts";
    pub const CREATE: &str = "/posts";

    pub fn detail(id: &str) -> String {
        format!("/posts/{id}")
    }

    pub fn update(id: &str) -> String {
        detail(id)
    }

    pub fn delete(id: &str) -> String {
        detail(id)
    }
}

pub mod comments {
    pub const LIST: &str = "/comments";
    pub const CREATE: &str = "/comments";

    /// Comments belonging to one post.
    pub fn by_post(post_id: &str) -> String {
        format!("/posts/{post_id}/comments")
    }

    pub fn update(id: &str) -> String {
        format!("/comments/{id}")
    }

    pub fn delete(id: &str) -> String {
        update(id)
    }
}

pub mod example {
    pub const DATA: &str = "/example";
    pub const QUERY: &str = "/example/query";
}

pub mod auth {
    pub const LOGIN: &str = "/auth/login";
    pub const LOGOUT: &str = "/auth/logout";
    pub const REGISTER: &str = "/auth/register";
    pub const REFRESH: &str = "/auth/refresh";
}
