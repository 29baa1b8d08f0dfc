//! Summary and description templates per ticket type
//!
//! Every ticket of a type gets the same summary shape, parameterised by the
//! epic, tab or entity it concerns. Descriptions are markdown with an
//! acceptance-criteria section and an important-notes section; values that
//! were never stated are rendered as `<placeholders>` for the reviewer.

use crate::types::{Priority, Scope, Ticket, TicketDetails, TicketType};

/// Epic-level values shared by every ticket of one epic
#[derive(Debug, Clone, Copy)]
pub struct TemplateContext<'a> {
    /// Epic name
    pub epic: &'a str,
    /// Epic scope
    pub scope: Scope,
    /// Parent menu used when a nav ticket names none
    pub nav_parent: &'a str,
}

/// Build a complete ticket from its type and details
#[must_use]
pub fn render(
    ticket_type: TicketType,
    details: TicketDetails,
    priority: Priority,
    ctx: TemplateContext<'_>,
) -> Ticket {
    Ticket {
        ticket_type,
        summary: summary(ticket_type, &details, ctx),
        description: description(ticket_type, &details, ctx),
        priority,
        details,
    }
}

/// Summary line for a ticket
#[must_use]
pub fn summary(ticket_type: TicketType, details: &TicketDetails, ctx: TemplateContext<'_>) -> String {
    let epic = ctx.epic;
    let tab = details.tab_name.as_deref().unwrap_or(epic);
    match ticket_type {
        TicketType::BackendArchitecture => format!("BE: Implement backend architecture of \"{epic}\""),
        TicketType::RbacPermissions => format!(
            "Adding RBAC permissions related to \"{epic}\" in Permission tab of Administration menu"
        ),
        TicketType::NavMenu => format!(
            "FE: User should be able to view a new menu \"{epic}\" under \"{}\" in nav panel",
            details.nav_parent.as_deref().unwrap_or(ctx.nav_parent)
        ),
        TicketType::ViewTableData => {
            format!("User should be able to access and view data in the table of '{tab}' tab")
        }
        TicketType::SearchFilter => {
            format!("User should be able to Search and Filter data in '{tab}' tab")
        }
        TicketType::AddEntity => {
            let entity = details.entity_name.as_deref().unwrap_or("record");
            format!(
                "User should be able to add a {entity} by clicking on \"+ {}\" CTA",
                title_case(entity)
            )
        }
        TicketType::PerformActions => format!(
            "User should be able to perform actions on {} in '{tab}' tab",
            details.entity_name.as_deref().unwrap_or("records")
        ),
        TicketType::Download => {
            format!("User should be able to download all the records in \"{epic}\" feature")
        }
        TicketType::UploadCsv => {
            format!("User should be able to upload data in bulk in \"{epic}\" feature")
        }
        TicketType::EdgeCases => format!("Handling deleted data edge cases in {epic}"),
    }
}

/// Markdown description for a ticket
#[must_use]
pub fn description(
    ticket_type: TicketType,
    details: &TicketDetails,
    ctx: TemplateContext<'_>,
) -> String {
    let mut out = match ticket_type {
        TicketType::BackendArchitecture => backend(details),
        TicketType::RbacPermissions => rbac(details, ctx),
        TicketType::NavMenu => nav(details, ctx),
        TicketType::ViewTableData => view_table(details, ctx),
        TicketType::SearchFilter => search_filter(details, ctx),
        TicketType::AddEntity => add_entity(details, ctx),
        TicketType::PerformActions => perform_actions(details, ctx),
        TicketType::Download | TicketType::UploadCsv => bulk(ticket_type, ctx),
        TicketType::EdgeCases => edge_cases(details, ctx),
    };
    if ticket_type != TicketType::BackendArchitecture && !details.notes.is_empty() {
        out.push_str("\n**From the meeting:**\n\n");
        out.push_str(&bullets(&details.notes));
    }
    out
}

fn backend(details: &TicketDetails) -> String {
    let mut out = String::from(
        "**Acceptance criteria:**\n\nCreate following:\n\n* Model for database\n* Service\n* Entity\n* Controller\n* Routes\n",
    );
    if !details.notes.is_empty() {
        out.push_str("\n---\n\n### Important Notes\n\n");
        out.push_str(&bullets(&details.notes));
    }
    out
}

fn view_table(details: &TicketDetails, ctx: TemplateContext<'_>) -> String {
    let columns = if details.columns.is_empty() {
        "1. <Column 1> (<Format>)\n2. <Column 2> (<Format>)\n3. <Column 3>\n".to_string()
    } else {
        details
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| match &c.format {
                Some(format) => format!("{}. {} ({format})\n", i + 1, c.name),
                None => format!("{}. {}\n", i + 1, c.name),
            })
            .collect()
    };
    format!(
        "User should be able to access and view data in the table of '{tab}' tab.\n\n\
         **Acceptance criteria:**\n\n\
         The table should have the following columns:\n\n\
         {columns}\n\
         ---\n\n\
         ### Important Notes\n\n\
         * Table should be sorted in descending order. Latest records should appear on top.\n\
         * Pagination to be implemented.\n\
         * Will be {scope} feature\n\
         * Actions will be frozen for mobiles and smaller screens where horizontal scroll comes.\n\
         * Use new design tokens as provided in Figma designs.\n",
        tab = details.tab_name.as_deref().unwrap_or(ctx.epic),
        scope = ctx.scope,
    )
}

fn add_entity(details: &TicketDetails, ctx: TemplateContext<'_>) -> String {
    let entity = details.entity_name.as_deref().unwrap_or("record");
    let fields = if details.fields.is_empty() {
        "* <Field 1> * (Type: <Type>. Default: <Default>)\n\
         * <Field 2> * (Type: <Type>)\n\
         * <Field 3> (Type: <Type>. Mandatory only when <Condition>)\n\
         * <Comments/Notes> (Type: Large expandable text. <Mandatory/Optional>)\n"
            .to_string()
    } else {
        details
            .fields
            .iter()
            .map(|f| {
                let star = if f.mandatory { " *" } else { "" };
                let mut extra = String::new();
                if !f.options.is_empty() {
                    extra.push_str(&format!(" Options: {}.", f.options.join(", ")));
                }
                if let Some(condition) = &f.condition {
                    extra.push_str(&format!(" Mandatory only when {condition}."));
                }
                format!("* {}{star} (Type: {}.{extra})\n", f.name, f.field_type)
            })
            .collect()
    };
    let mut out = format!(
        "User should be able to add a {entity} by clicking on \"+ {title}\" CTA that will open a modal with fields:\n\n\
         {fields}\
         * Save CTA\n\n\
         **Submit workflow:**\n\n\
         * Add a record in table\n\
         * Auto-populate <auto fields>\n\
         * Send notification to <RBAC> users\n",
        title = title_case(entity),
    );
    if !details.rules.is_empty() {
        out.push_str("\n**Validation rules:**\n\n");
        out.push_str(&bullets(&details.rules));
    }
    out.push_str(&format!(
        "\n---\n\n### Important Notes\n\n* Will be {} feature\n* <Mobile behavior>\n",
        ctx.scope
    ));
    out
}

fn rbac(details: &TicketDetails, ctx: TemplateContext<'_>) -> String {
    let epic = ctx.epic;
    let (roles, rules) = if details.rbac.is_empty() {
        (
            "* <Role 1>\n* <Role 2>\n".to_string(),
            "**<Role 1>**: EDIT of this should allow the user to <actions>. VIEW access should only allow <read actions>.\n"
                .to_string(),
        )
    } else {
        let roles: String = details.rbac.keys().map(|r| format!("* {r}\n")).collect();
        let rules = details
            .rbac
            .iter()
            .map(|(role, actions)| format!("**{role}**: {}.\n", actions.join("; ")))
            .collect::<Vec<_>>()
            .join("\n");
        (roles, rules)
    };
    format!(
        "Add RBAC permissions related to \"{epic}\" in Permission tab of Administration menu.\n\n\
         **Acceptance criteria:**\n\n\
         There should be a heading of {epic} with permissions for the following roles:\n\n\
         {roles}\n\
         {rules}\n\
         ---\n\n\
         ### Important Notes\n\n\
         * HIDE of a permission should hide the matching UI element.\n\
         * If all permissions are HIDE for a role, then the feature should not appear in the nav bar.\n"
    )
}

fn search_filter(details: &TicketDetails, ctx: TemplateContext<'_>) -> String {
    let search = details.search.clone().unwrap_or_default();
    let search_text = if search.search_fields.is_empty() {
        "User should be able to perform Search on <Fields>. Implement Fuzzy Logic".to_string()
    } else {
        format!(
            "User should be able to perform Search on {}. Implement Fuzzy Logic",
            search.search_fields.join(", ")
        )
    };
    let filters = if search.filters.is_empty() {
        "1. <Filter 1> (by default <Default>)\n2. <Filter 2> (by default <Default>)\n".to_string()
    } else {
        search
            .filters
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{}. {f} (Dropdown, by default All)\n", i + 1))
            .collect()
    };
    format!(
        "User should be able to filter the records in table of {tab}.\n\n\
         **Acceptance criteria:**\n\n\
         User should be able to view and click on \"Filter CTA\" that will open a drawer. Including:\n\n\
         **Search**\n\n\
         {search_text}\n\n\
         ---\n\n\
         **Filters**\n\n\
         User should be able to click on the Filters CTA and apply the following filters:\n\n\
         {filters}\n\
         ---\n\n\
         ### Important Notes\n\n\
         * Table should be filtered based on selected filter options\n",
        tab = details.tab_name.as_deref().unwrap_or(ctx.epic),
    )
}

fn nav(details: &TicketDetails, ctx: TemplateContext<'_>) -> String {
    format!(
        "**Acceptance criteria:**\n\n\
         * A new menu \"{epic}\" appears under \"{parent}\" in the nav panel\n\
         * Clicking the menu opens the {epic} landing page\n\n\
         ---\n\n\
         ### Important Notes\n\n\
         * Menu visibility follows the RBAC permissions of {epic}\n",
        epic = ctx.epic,
        parent = details.nav_parent.as_deref().unwrap_or(ctx.nav_parent),
    )
}

fn perform_actions(details: &TicketDetails, ctx: TemplateContext<'_>) -> String {
    format!(
        "**Acceptance criteria:**\n\n\
         User should be able to perform actions on {entity} in the '{tab}' tab from the row action menu.\n\n\
         ---\n\n\
         ### Important Notes\n\n\
         * Each action asks for confirmation before it is applied\n\
         * Will be {scope} feature\n",
        entity = details.entity_name.as_deref().unwrap_or("records"),
        tab = details.tab_name.as_deref().unwrap_or(ctx.epic),
        scope = ctx.scope,
    )
}

fn bulk(ticket_type: TicketType, ctx: TemplateContext<'_>) -> String {
    let criteria = if ticket_type == TicketType::Download {
        "* A Download CTA exports all the records of the feature\n* Applied filters are respected\n"
    } else {
        "* An Upload CTA accepts a CSV file\n* Rows that fail validation are reported back to the user\n"
    };
    format!(
        "**Acceptance criteria:**\n\n\
         {criteria}\n\
         ---\n\n\
         ### Important Notes\n\n\
         * Will be {} feature\n",
        ctx.scope
    )
}

fn edge_cases(details: &TicketDetails, ctx: TemplateContext<'_>) -> String {
    let rules = if details.rules.is_empty() {
        "* <Edge case 1>\n".to_string()
    } else {
        bullets(&details.rules)
    };
    format!(
        "**Acceptance criteria:**\n\n\
         Deleted or archived data in {epic} is handled as follows:\n\n\
         {rules}\n\
         ---\n\n\
         ### Important Notes\n\n\
         * Historical records keep referring to deleted data by name\n",
        epic = ctx.epic,
    )
}

fn bullets(lines: &[String]) -> String {
    lines.iter().map(|l| format!("* {l}\n")).collect()
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
