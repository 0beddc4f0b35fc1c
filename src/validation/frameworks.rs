//! Infrastructure frameworks that the domain and application layers must
//! not depend on.

/// Package prefix and the framework it belongs to
const FRAMEWORKS: &[(&str, &str)] = &[
    ("javax.persistence", "JPA/Persistence"),
    ("jakarta.persistence", "JPA/Persistence"),
    ("org.springframework", "Spring Framework"),
    ("org.hibernate.validator", "Validation Framework"),
    ("org.hibernate", "Hibernate ORM"),
    ("com.fasterxml.jackson", "Jackson JSON"),
    ("javax.sql", "JDBC"),
    ("java.sql", "JDBC"),
    ("software.amazon", "AWS SDK"),
    ("com.stripe", "Stripe API"),
    ("com.azure", "Azure SDK"),
    ("com.google.cloud", "Google Cloud SDK"),
    ("org.apache.kafka", "Messaging"),
    ("com.rabbitmq", "Messaging"),
    ("javax.jms", "Messaging"),
    ("jakarta.jms", "Messaging"),
    ("javax.servlet", "Web/HTTP"),
    ("jakarta.servlet", "Web/HTTP"),
    ("javax.ws.rs", "Web/HTTP"),
    ("jakarta.ws.rs", "Web/HTTP"),
    ("javax.validation", "Validation Framework"),
    ("jakarta.validation", "Validation Framework"),
];

/// Framework owning `qualified_name`, matched on whole package segments
pub fn framework_of(qualified_name: &str) -> Option<&'static str> {
    FRAMEWORKS.iter().find_map(|(prefix, category)| {
        qualified_name
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
            .then_some(*category)
    })
}
