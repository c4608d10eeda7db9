// ABOUTME: GraphQL documents sent to the Linear API
// ABOUTME: Static documents plus builders for schema-dependent variants

/// Viewer and workspace lookups
pub mod workspace {
    pub const VIEWER: &str = "query {
  viewer {
    id
    name
    email
  }
}";

    pub const ME: &str = "query {
  me {
    id
    name
    email
  }
}";

    pub const TEAMS: &str = "query {
  teams {
    nodes { id key name }
  }
}";

    pub const TEAM_BY_KEY: &str = "query($key: String!) {
  teams(filter: { key: { eq: $key } }) {
    nodes { id key name }
  }
}";

    pub fn team_by_id(id_type: &str) -> String {
        format!(
            "query($id: {id_type}!) {{
  team(id: $id) {{ id key name }}
}}"
        )
    }

    pub fn workflow_states(id_type: &str) -> String {
        format!(
            "query($id: {id_type}!) {{
  team(id: $id) {{
    states {{
      nodes {{ id name type }}
    }}
  }}
}}"
        )
    }

    pub const USER_BY_EMAIL: &str = "query($email: String!) {
  users(filter: { email: { eq: $email } }) {
    nodes { id }
  }
}";

    pub const LABEL_BY_NAME: &str = "query($name: String!) {
  issueLabels(filter: { name: { eq: $name } }) {
    nodes { id }
  }
}";

    pub const PROJECT_BY_NAME: &str = "query($name: String!) {
  projects(filter: { name: { eq: $name } }) {
    nodes { id }
  }
}";
}

/// Issue queries and mutations
pub mod issues {
    pub const ISSUE_ID: &str = "query($id: String!) {
  issue(id: $id) { id }
}";

    pub const ISSUE: &str = "query($id: String!) {
  issue(id: $id) {
    id
    identifier
    title
    url
    description
    priority
    createdAt
    updatedAt
    team { id key }
    state { name }
    assignee { name }
    cycle { name }
    project { name }
    labels { nodes { name } }
  }
}";

    pub fn issue_comments(include_body_data: bool) -> String {
        let body_data = if include_body_data { " bodyData" } else { "" };
        format!(
            "query($id: String!, $first: Int) {{
  issue(id: $id) {{
    comments(first: $first) {{
      nodes {{ id body{body_data} createdAt user {{ name email }} }}
    }}
  }}
}}"
        )
    }

    pub const ISSUE_ATTACHMENTS: &str = "query($id: String!, $first: Int) {
  issue(id: $id) {
    attachments(first: $first) {
      nodes { id title url source createdAt }
    }
  }
}";

    pub fn issue_description(include_description_data: bool) -> String {
        let description_data = if include_description_data {
            " descriptionData"
        } else {
            ""
        };
        format!(
            "query($id: String!) {{
  issue(id: $id) {{ id description{description_data} }}
}}"
        )
    }

    pub const ISSUE_RELATIONS: &str = "query($id: String!, $first: Int) {
  issue(id: $id) {
    relations(first: $first) { nodes { id type issue { id } relatedIssue { id } } }
    inverseRelations(first: $first) { nodes { id type issue { id } relatedIssue { id } } }
  }
}";

    pub const ISSUES: &str = "query($filter: IssueFilter, $first: Int, $after: String) {
  issues(filter: $filter, first: $first, after: $after) {
    nodes {
      id
      identifier
      title
      url
      priority
      state { name }
      assignee { name }
      team { key }
      cycle { name }
    }
    pageInfo { hasNextPage endCursor }
  }
}";

    pub const ISSUE_CREATE: &str = "mutation($input: IssueCreateInput!) {
  issueCreate(input: $input) {
    issue { id identifier title url }
  }
}";

    pub const ISSUE_UPDATE: &str = "mutation($id: String!, $input: IssueUpdateInput!) {
  issueUpdate(id: $id, input: $input) {
    issue { id identifier title url }
  }
}";

    pub const COMMENT_CREATE: &str = "mutation($input: CommentCreateInput!) {
  commentCreate(input: $input) {
    comment { id }
  }
}";

    pub const RELATION_CREATE: &str = "mutation($input: IssueRelationCreateInput!) {
  issueRelationCreate(input: $input) {
    issueRelation { id type issue { id } relatedIssue { id } }
  }
}";

    pub const RELATION_DELETE: &str = "mutation($id: String!) {
  issueRelationDelete(id: $id) {
    success
  }
}";
}

/// Cycle queries
pub mod cycles {
    pub const CYCLES: &str = "query($filter: CycleFilter, $first: Int, $after: String) {
  cycles(filter: $filter, first: $first, after: $after) {
    nodes { id name number startsAt endsAt isActive }
    pageInfo { hasNextPage endCursor }
  }
}";

    pub fn team_cycles(id_type: &str) -> String {
        format!(
            "query($id: {id_type}!, $first: Int, $after: String) {{
  team(id: $id) {{
    cycles(first: $first, after: $after) {{
      nodes {{ id name number startsAt endsAt isActive }}
      pageInfo {{ hasNextPage endCursor }}
    }}
  }}
}}"
        )
    }

    pub fn cycle(id_type: &str) -> String {
        format!(
            "query($id: {id_type}!) {{
  cycle(id: $id) {{ id name number startsAt endsAt isActive }}
}}"
        )
    }
}

/// Schema introspection
pub mod introspection {
    pub const SCHEMA: &str = "query {
  __type(name: \"Query\") {
    fields {
      name
      args {
        name
        type { kind name ofType { kind name ofType { kind name ofType { kind name } } } }
      }
      type { kind name ofType { kind name ofType { kind name } } }
    }
  }
  issue: __type(name: \"Issue\") {
    fields { name type { kind name ofType { kind name ofType { kind name } } } }
  }
  comment: __type(name: \"Comment\") {
    fields { name type { kind name ofType { kind name ofType { kind name } } } }
  }
  user: __type(name: \"User\") {
    fields { name type { kind name ofType { kind name ofType { kind name } } } }
  }
}";

    pub const TYPE_FIELDS: &str = "query($name: String!) {
  __type(name: $name) {
    fields { name type { kind name ofType { kind name ofType { kind name ofType { kind name } } } } }
  }
}";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_type_is_substituted() {
        assert!(workspace::team_by_id("String").starts_with("query($id: String!)"));
        assert!(workspace::workflow_states("ID").starts_with("query($id: ID!)"));
        assert!(cycles::team_cycles("ID").contains("team(id: $id)"));
        assert!(cycles::cycle("String").contains("cycle(id: $id)"));
    }

    #[test]
    fn test_optional_selections() {
        assert!(issues::issue_comments(true).contains("body bodyData createdAt"));
        assert!(!issues::issue_comments(false).contains("bodyData"));
        assert!(issues::issue_description(true).contains("descriptionData"));
        assert!(!issues::issue_description(false).contains("descriptionData"));
    }
}
