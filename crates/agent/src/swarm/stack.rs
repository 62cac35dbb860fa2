//! Stack — stack membership derived from service labels.
//!
//! A stack is not stored by the daemon; it is the value of the
//! `com.docker.stack.namespace` label that `docker stack deploy` stamps on
//! every service it creates. Services without it belong to the
//! [`STANDALONE`] pseudo-stack.

use super::model::Service;

/// Label `docker stack deploy` sets on every service of a stack.
pub const STACK_NAMESPACE_LABEL: &str = "com.docker.stack.namespace";

/// Stack name for services deployed outside any stack.
pub const STANDALONE: &str = "standalone";

/// Stack name of a service; [`STANDALONE`] when the label is missing or empty.
pub fn resolve_stack(service: &Service) -> &str {
    service
        .labels
        .get(STACK_NAMESPACE_LABEL)
        .map(String::as_str)
        .filter(|ns| !ns.is_empty())
        .unwrap_or(STANDALONE)
}

/// Human-readable alternate identifier: `<stack>_<name>`, or just `<name>`
/// for standalone services.
///
/// Discovery output and identifier lookup both go through this function so
/// a key emitted by one invocation resolves in the next.
pub fn service_key(service: &Service) -> String {
    match resolve_stack(service) {
        STANDALONE => service.name.clone(),
        stack => format!("{}_{}", stack, service.name),
    }
}

/// Services sharing one derived stack name.
#[derive(Debug)]
pub struct Stack<'a> {
    pub name: &'a str,
    pub services: Vec<&'a Service>,
}

/// Group services by stack, keeping stacks in first-seen order and
/// services in API order within each stack.
pub fn group_stacks(services: &[Service]) -> Vec<Stack<'_>> {
    let mut stacks: Vec<Stack<'_>> = Vec::new();
    for service in services {
        let name = resolve_stack(service);
        match stacks.iter_mut().find(|s| s.name == name) {
            Some(stack) => stack.services.push(service),
            None => stacks.push(Stack {
                name,
                services: vec![service],
            }),
        }
    }
    stacks
}
