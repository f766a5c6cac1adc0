//! Closed set of account roles and the capability table deciding which
//! sections and row actions each role may use.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Instructor, Role::Student];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Instructor => "instructor",
            Role::Student => "student",
        }
    }

    /// Capabilities granted to the role.
    pub fn capabilities(self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Role::Admin => &[
                BrowseCatalog,
                ManageUsers,
                ReviewInstructors,
                ManageCategories,
                ManageBlogs,
                ViewCourses,
                ModerateCourses,
                ViewCourseLogs,
                ManagePayouts,
                ViewPurchases,
            ],
            Role::Instructor => &[
                BrowseCatalog,
                ViewCourses,
                AuthorCourses,
                ViewCourseLogs,
                RequestPayouts,
                ViewPurchases,
                ViewReviews,
                ViewSubscribers,
            ],
            Role::Student => &[
                BrowseCatalog,
                ViewPurchases,
                WriteReviews,
                ViewSubscriptions,
                UseCart,
            ],
        }
    }

    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Navigation entries visible to the role, in sidebar order.
    pub fn sections(self) -> Vec<&'static Section> {
        SECTIONS
            .iter()
            .filter(|section| self.can(section.capability))
            .collect()
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "instructor" => Ok(Role::Instructor),
            "student" => Ok(Role::Student),
            other => Err(TypeConstraintError::InvalidValue(format!("unknown role {other}"))),
        }
    }
}

/// Something a role may see or do.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    BrowseCatalog,
    ManageUsers,
    ReviewInstructors,
    ManageCategories,
    ManageBlogs,
    ViewCourses,
    AuthorCourses,
    ModerateCourses,
    ViewCourseLogs,
    ManagePayouts,
    RequestPayouts,
    ViewPurchases,
    ViewReviews,
    WriteReviews,
    ViewSubscribers,
    ViewSubscriptions,
    UseCart,
}

/// Sidebar entry guarded by a capability.
#[derive(Debug, Serialize)]
pub struct Section {
    pub key: &'static str,
    pub label: &'static str,
    pub url: &'static str,
    #[serde(skip)]
    pub capability: Capability,
}

pub const SECTIONS: &[Section] = &[
    Section {
        key: "users",
        label: "User Management",
        url: "/admin/users",
        capability: Capability::ManageUsers,
    },
    Section {
        key: "requests",
        label: "Request Management",
        url: "/admin/requests",
        capability: Capability::ReviewInstructors,
    },
    Section {
        key: "categories",
        label: "Category Management",
        url: "/admin/categories",
        capability: Capability::ManageCategories,
    },
    Section {
        key: "admin_blogs",
        label: "Blog Management",
        url: "/admin/blogs",
        capability: Capability::ManageBlogs,
    },
    Section {
        key: "courses",
        label: "Courses",
        url: "/courses",
        capability: Capability::ViewCourses,
    },
    Section {
        key: "course_logs",
        label: "Course Log",
        url: "/course-logs",
        capability: Capability::ViewCourseLogs,
    },
    Section {
        key: "payouts",
        label: "Payout Management",
        url: "/payouts",
        capability: Capability::ManagePayouts,
    },
    Section {
        key: "payouts",
        label: "Payout",
        url: "/payouts",
        capability: Capability::RequestPayouts,
    },
    Section {
        key: "purchases",
        label: "Purchases",
        url: "/purchases",
        capability: Capability::ViewPurchases,
    },
    Section {
        key: "reviews",
        label: "Review",
        url: "/reviews",
        capability: Capability::ViewReviews,
    },
    Section {
        key: "subscriptions",
        label: "Subscribers",
        url: "/subscriptions",
        capability: Capability::ViewSubscribers,
    },
    Section {
        key: "subscriptions",
        label: "Subscriptions",
        url: "/subscriptions",
        capability: Capability::ViewSubscriptions,
    },
    Section {
        key: "cart",
        label: "Cart",
        url: "/cart",
        capability: Capability::UseCart,
    },
];
