use clap::ValueEnum;
use pkg_manifest::Manifests;
use pkg_types::rbac::{RoleRef, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Yaml,
    Json,
}

pub fn print(manifests: &Manifests, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print!("{}", render_table(manifests)),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(manifests)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(manifests)?),
    }
    Ok(())
}

fn render_table(manifests: &Manifests) -> String {
    let mut out = format!(
        "{:<20} {:<32} {:<20} {}\n",
        "KIND", "NAME", "NAMESPACE", "DETAIL"
    );
    let mut row = |kind: &str, name: &str, namespace: &str, detail: String| {
        out.push_str(&format!(
            "{:<20} {:<32} {:<20} {}\n",
            kind,
            name,
            if namespace.is_empty() { "-" } else { namespace },
            detail
        ));
    };

    for r in &manifests.roles {
        row(&r.type_meta.kind, &r.metadata.name, &r.metadata.namespace, format!("{} rule(s)", r.rules.len()));
    }
    for r in &manifests.cluster_roles {
        row(&r.type_meta.kind, &r.metadata.name, &r.metadata.namespace, format!("{} rule(s)", r.rules.len()));
    }
    for b in &manifests.role_bindings {
        row(&b.type_meta.kind, &b.metadata.name, &b.metadata.namespace, binding_detail(&b.role_ref, &b.subjects));
    }
    for b in &manifests.cluster_role_bindings {
        row(&b.type_meta.kind, &b.metadata.name, &b.metadata.namespace, binding_detail(&b.role_ref, &b.subjects));
    }

    if manifests.is_empty() {
        out.push_str("(no RBAC objects found)\n");
    }
    out
}

fn binding_detail(role_ref: &RoleRef, subjects: &[Subject]) -> String {
    format!("{}/{} -> {} subject(s)", role_ref.kind, role_ref.name, subjects.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkg_types::meta::ObjectMeta;
    use pkg_types::rbac::{PolicyRule, Role, RoleBinding};

    #[test]
    fn table_lists_every_record() {
        let manifests = Manifests {
            roles: vec![Role::new(
                ObjectMeta::named("r1", "ns1"),
                vec![PolicyRule::new(&[""], &["pods"], &["get"])],
            )],
            role_bindings: vec![RoleBinding::new(
                ObjectMeta::named("rb1", ""),
                RoleRef::rbac("Role", "r1"),
                vec![Subject::service_account("sa1", "ns1")],
            )],
            ..Default::default()
        };
        let table = render_table(&manifests);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("KIND"));
        assert!(lines[1].starts_with("Role "));
        assert!(lines[1].contains("ns1"));
        assert!(lines[1].ends_with("1 rule(s)"));
        assert!(lines[2].starts_with("RoleBinding"));
        assert!(lines[2].ends_with("Role/r1 -> 1 subject(s)"));
    }

    #[test]
    fn empty_table_says_so() {
        let table = render_table(&Manifests::default());
        assert!(table.ends_with("(no RBAC objects found)\n"));
    }
}
