use std::collections::HashMap;

use tracing::debug;

pub const FALLBACK: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone)]
struct Route<V> {
    path: String,
    segments: Vec<Segment>,
    view: V,
}

impl<V> Route<V> {
    fn is_exact(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    fn params(&self, parts: &[&str]) -> Option<HashMap<String, String>> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

/// A resolved path.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a, V> {
    pub view: &'a V,
    pub pattern: &'a str,
    pub params: HashMap<String, String>,
}

impl<V> Match<'_, V> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn is_fallback(&self) -> bool {
        self.pattern == FALLBACK
    }
}

/// Maps paths to views. Patterns are either exact (`/routes/add`) or contain
/// `:name` segments matching exactly one path segment (`/routes/:id`). `*`
/// registers the view used when nothing else matches.
#[derive(Debug, Clone)]
pub struct Router<V> {
    routes: Vec<Route<V>>,
    fallback: Option<V>,
}

impl<V> Default for Router<V> {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            fallback: None,
        }
    }
}

impl<V> Router<V> {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers `view` for `path`. Registering a pattern twice replaces the earlier view.
    pub fn add(&mut self, path: &str, view: V) -> &mut Self {
        if path == FALLBACK {
            self.fallback = Some(view);
            return self;
        }
        let segments: Vec<Segment> = split(path)
            .into_iter()
            .map(|part| match part.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(part.to_string()),
            })
            .collect();
        let route = Route {
            path: path.to_string(),
            segments,
            view,
        };
        match self.routes.iter_mut().find(|existing| existing.path == path) {
            Some(existing) => *existing = route,
            None => self.routes.push(route),
        }
        self
    }

    /// Exact patterns win over parameter patterns, which are tried in
    /// registration order. Falls back to `*` when registered.
    pub fn resolve(&self, path: &str) -> Option<Match<'_, V>> {
        let parts = split(path);

        let exact = self
            .routes
            .iter()
            .filter(|route| route.is_exact())
            .find_map(|route| route.params(&parts).map(|params| (route, params)));
        let found = exact.or_else(|| {
            self.routes
                .iter()
                .filter(|route| !route.is_exact())
                .find_map(|route| route.params(&parts).map(|params| (route, params)))
        });

        match found {
            Some((route, params)) => Some(Match {
                view: &route.view,
                pattern: &route.path,
                params,
            }),
            None => {
                debug!("No route for {path}");
                self.fallback.as_ref().map(|view| Match {
                    view,
                    pattern: FALLBACK,
                    params: HashMap::new(),
                })
            }
        }
    }
}

fn split(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|part| !part.is_empty()).collect()
}
