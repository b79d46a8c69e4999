use crate::route::{Route, RouteMethod};
use hyper::Method;
use std::collections::HashMap;

/// Routes grouped by method, in registration order, plus the wildcard-method bucket.
pub(crate) struct RouteTable<T, E> {
    by_method: HashMap<Method, Vec<Route<T, E>>>,
    any_method: Vec<Route<T, E>>,
}

impl<T, E> RouteTable<T, E> {
    pub(crate) fn new() -> RouteTable<T, E> {
        RouteTable {
            by_method: HashMap::new(),
            any_method: Vec::new(),
        }
    }

    pub(crate) fn register(&mut self, method: RouteMethod, route: Route<T, E>) {
        match method {
            RouteMethod::Any => self.any_method.push(route),
            RouteMethod::Only(method) => self.by_method.entry(method).or_default().push(route),
        }
    }

    /// The candidates for a request method: its own routes first, then the wildcard-method ones.
    pub(crate) fn lookup<'a>(&'a self, method: &Method) -> impl Iterator<Item = &'a Route<T, E>> + 'a {
        self.by_method
            .get(method)
            .into_iter()
            .flatten()
            .chain(self.any_method.iter())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (RouteMethod, &Route<T, E>)> + '_ {
        self.by_method
            .iter()
            .flat_map(|(method, routes)| routes.iter().map(move |route| (RouteMethod::Only(method.clone()), route)))
            .chain(self.any_method.iter().map(|route| (RouteMethod::Any, route)))
    }

    pub(crate) fn len(&self) -> usize {
        self.by_method.values().map(Vec::len).sum::<usize>() + self.any_method.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn table() -> RouteTable<(), Infallible> {
        let mut table = RouteTable::new();
        table.register(RouteMethod::Any, Route::new("/any", Vec::new()));
        table.register(RouteMethod::Only(Method::GET), Route::new("/first", Vec::new()));
        table.register(RouteMethod::Only(Method::POST), Route::new("/post", Vec::new()));
        table.register(RouteMethod::Only(Method::GET), Route::new("/second", Vec::new()));
        table
    }

    #[test]
    fn lookup_puts_method_routes_before_wildcard_routes() {
        let table = table();
        let paths: Vec<&str> = table.lookup(&Method::GET).map(Route::path).collect();
        assert_eq!(paths, vec!["/first", "/second", "/any"]);
    }

    #[test]
    fn lookup_falls_back_to_wildcard_routes() {
        let table = table();
        let paths: Vec<&str> = table.lookup(&Method::DELETE).map(Route::path).collect();
        assert_eq!(paths, vec!["/any"]);
    }

    #[test]
    fn counts_every_route() {
        let table = table();
        assert_eq!(table.len(), 4);
        assert_eq!(table.iter().filter(|(method, _)| *method == RouteMethod::Any).count(), 1);
    }
}
