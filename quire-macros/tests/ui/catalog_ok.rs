use quire_macros::PermissionCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Content,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PermissionCatalog)]
#[domain_type(Area)]
pub enum Permission {
    /// Write new posts
    #[permission(id = "content:create", domain = Content)]
    CreateContent,

    #[permission(id = "system:admin_access", domain = System)]
    AdminAccess,
}

fn main() {
    assert_eq!(Permission::COUNT, 2);
    assert_eq!(Permission::ALL, &[Permission::CreateContent, Permission::AdminAccess]);
    assert_eq!(Permission::AdminAccess.index(), 1);
    assert_eq!(Permission::CreateContent.identifier(), "content:create");
    assert_eq!(Permission::CreateContent.description(), "Write new posts");
    assert_eq!(Permission::AdminAccess.description(), "system:admin_access");
    assert_eq!(Permission::AdminAccess.domain(), Area::System);
    assert_eq!(Permission::from_identifier("content:create"), Some(Permission::CreateContent));
    assert_eq!(Permission::from_identifier("content:nope"), None);
}
