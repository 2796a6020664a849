pub mod upstream {

    pub const API_BASE: &str = "https://kmit-api.teleuniv.in";

    pub const PORTAL_ORIGIN: &str = "https://kmit.teleuniv.in";

    /// Constant browser UA the portal expects on every relayed request.
    pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";

    pub const LOGIN_APPLICATION: &str = "netra";

    pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 15;

    pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
}

pub mod limits {

    pub const MAX_SEARCH_RESULTS: usize = 20;
}
