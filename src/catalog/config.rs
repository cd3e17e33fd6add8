pub struct Config {
    pub base_url: String,
    pub all_stops_path: String,
    pub route_path: String,
    pub add_route_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            all_stops_path: "/api/busStop/all".into(),
            route_path: "/api/busRoute".into(),
            add_route_path: "/api/busRoute/addRoute".into(),
        }
    }
}

impl Config {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
