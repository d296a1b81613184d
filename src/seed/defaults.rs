//! Default content written by the seeder, one payload set per profile.

use std::collections::BTreeMap;

use crate::models::{
    ContactInfoInput, ContentSectionInput, HomeStatsInput, ProjectInput, Section, ServiceInput,
    TestimonialInput,
};

/// SeedData
///
/// Everything one profile inserts. List order is insertion order.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub content_sections: Vec<ContentSectionInput>,
    pub contact_info: ContactInfoInput,
    pub testimonials: Vec<TestimonialInput>,
    pub services: Vec<ServiceInput>,
    pub home_stats: Vec<HomeStatsInput>,
    pub projects: Vec<ProjectInput>,
}

fn section(
    section: Section,
    title: &str,
    subtitle: Option<&str>,
    content: &str,
) -> ContentSectionInput {
    ContentSectionInput {
        section,
        title: title.to_string(),
        subtitle: subtitle.map(str::to_string),
        content: content.to_string(),
        image: None,
        image_url_fallback: None,
    }
}

fn links(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(platform, url)| (platform.to_string(), url.to_string()))
        .collect()
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

fn testimonial(
    name: &str,
    role: &str,
    company: &str,
    content: &str,
    image_url_fallback: Option<&str>,
    order: i32,
) -> TestimonialInput {
    TestimonialInput {
        name: name.to_string(),
        role: role.to_string(),
        company: company.to_string(),
        content: content.to_string(),
        image: None,
        image_url_fallback: image_url_fallback.map(str::to_string),
        rating: 5,
        featured: true,
        order,
    }
}

fn service(title: &str, description: &str, icon: &str, order: i32) -> ServiceInput {
    ServiceInput {
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        order,
    }
}

fn stat(label: &str, value: &str, order: i32) -> HomeStatsInput {
    HomeStatsInput {
        label: label.to_string(),
        value: value.to_string(),
        order,
    }
}

const WORKED_WITH_US: &str = "Working with this team transformed our digital presence. Their attention to detail and innovative approach exceeded our expectations.";
const UNMATCHED: &str = "The level of professionalism and expertise is unmatched. They delivered a product that our users absolutely love.";

const STORE_DESCRIPTION: &str =
    "A modern e-commerce solution with real-time inventory and seamless checkout.";
const TASKS_DESCRIPTION: &str =
    "Collaborative task manager for remote teams with real-time updates.";

/// Minimal placeholder content meant to be edited right after install.
pub fn starter() -> SeedData {
    SeedData {
        content_sections: vec![
            section(
                Section::Hero,
                "Welcome to My Portfolio",
                Some("I build amazing things"),
                "This is the default hero content. Please edit it in the admin panel.",
            ),
            section(
                Section::Mission,
                "My Mission",
                Some("To deliver excellence"),
                "This is the default mission content. Please edit it in the admin panel.",
            ),
            section(
                Section::About,
                "About Me",
                Some("A brief introduction"),
                "This is the default about content. Please edit it in the admin panel.",
            ),
            section(
                Section::Contact,
                "Let's Work Together",
                Some("Get in Touch"),
                "Have a project in mind? We'd love to hear from you.",
            ),
        ],
        contact_info: ContactInfoInput {
            email: "ignitetechnologies3@gmail.com".to_string(),
            phone: "+251 942 830 589".to_string(),
            address: "Addis Ababa, Ethiopia".to_string(),
            social_links: links(&[
                ("github", "https://github.com"),
                ("linkedin", "https://linkedin.com"),
                ("twitter", "https://twitter.com"),
                ("instagram", "https://instagram.com"),
            ]),
        },
        testimonials: vec![
            testimonial(
                "Ignite Technologies",
                "CEO",
                "Ignite Technologies",
                WORKED_WITH_US,
                None,
                0,
            ),
            testimonial(
                "Michael Chen",
                "Product Manager",
                "Innovation Labs",
                UNMATCHED,
                None,
                1,
            ),
        ],
        services: vec![
            service(
                "Web Development",
                "Building fast, responsive, and accessible websites using modern technologies like React, Next.js, and Tailwind CSS.",
                "code",
                0,
            ),
            service(
                "UI/UX Design",
                "Creating intuitive and beautiful user interfaces that prioritize user experience and drive engagement.",
                "palette",
                1,
            ),
        ],
        home_stats: vec![
            stat("Years Experience", "5+", 0),
            stat("Projects Completed", "50+", 1),
            stat("Happy Clients", "30+", 2),
        ],
        projects: vec![
            ProjectInput {
                title: "E-Commerce Platform".to_string(),
                description: STORE_DESCRIPTION.to_string(),
                image: None,
                image_url_fallback: None,
                tags: tags(&["Next.js", "Stripe", "PostgreSQL"]),
                link: None,
                featured: true,
                order: 0,
            },
            ProjectInput {
                title: "Task Management App".to_string(),
                description: TASKS_DESCRIPTION.to_string(),
                image: None,
                image_url_fallback: None,
                tags: tags(&["React", "Firebase", "Tailwind"]),
                link: None,
                featured: true,
                order: 1,
            },
        ],
    }
}

const PROJECT_PLACEHOLDER: &str = "/placeholder.svg?height=600&width=800";
const AVATAR_PLACEHOLDER: &str = "/placeholder.svg?height=200&width=200";

fn showcase_project(
    title: &str,
    description: &str,
    project_tags: &[&str],
    link: Option<&str>,
    featured: bool,
    order: i32,
) -> ProjectInput {
    ProjectInput {
        title: title.to_string(),
        description: description.to_string(),
        image: None,
        image_url_fallback: Some(PROJECT_PLACEHOLDER.to_string()),
        tags: tags(project_tags),
        link: link.map(str::to_string),
        featured,
        order,
    }
}

/// Fuller demo content for a studio-style portfolio.
pub fn showcase() -> SeedData {
    let mut about = section(
        Section::About,
        "About Our Team",
        None,
        "We are a collective of designers, developers, and strategists who believe in the power of thoughtful digital experiences. With over a decade of combined experience, we partner with ambitious brands to create products that make a lasting impact. Our approach combines creative excellence with technical expertise to deliver solutions that exceed expectations.",
    );
    about.image_url_fallback = Some(PROJECT_PLACEHOLDER.to_string());

    SeedData {
        content_sections: vec![
            section(
                Section::Hero,
                "Creating Digital Experiences That Matter",
                Some("A Creative Team"),
                "We transform ideas into exceptional digital products through innovative design and strategic thinking.",
            ),
            about,
            section(
                Section::Mission,
                "Our Mission",
                None,
                "To elevate brands through exceptional design and development, creating digital experiences that inspire, engage, and drive meaningful results. We believe in collaboration, innovation, and the pursuit of excellence in everything we create.",
            ),
            section(
                Section::Contact,
                "Let's Work Together",
                None,
                "Have a project in mind? We'd love to hear from you. Get in touch and let's create something extraordinary.",
            ),
        ],
        contact_info: ContactInfoInput {
            email: "hello@yourteam.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            address: "123 Creative Street, Design City, DC 12345".to_string(),
            social_links: links(&[
                ("linkedin", "https://linkedin.com/company/yourteam"),
                ("twitter", "https://twitter.com/yourteam"),
                ("instagram", "https://instagram.com/yourteam"),
                ("github", "https://github.com/yourteam"),
            ]),
        },
        testimonials: vec![
            testimonial(
                "Sarah Johnson",
                "CEO",
                "TechStart Inc",
                WORKED_WITH_US,
                Some(AVATAR_PLACEHOLDER),
                1,
            ),
            testimonial(
                "Michael Chen",
                "Product Manager",
                "Innovation Labs",
                UNMATCHED,
                Some(AVATAR_PLACEHOLDER),
                2,
            ),
            testimonial(
                "Emily Rodriguez",
                "Marketing Director",
                "GrowthCo",
                "Exceptional work from start to finish. The team was responsive, creative, and delivered exactly what we needed.",
                None,
                3,
            ),
        ],
        services: vec![
            service(
                "Brand Strategy & Identity",
                "We craft compelling brand narratives and visual identities that resonate with your target audience and stand out in the market.",
                "palette",
                1,
            ),
            service(
                "Web & Mobile Development",
                "Custom-built websites and applications using cutting-edge technologies to deliver exceptional user experiences.",
                "code",
                2,
            ),
            service(
                "UX/UI Design",
                "User-centered design solutions that prioritize functionality, accessibility, and aesthetic excellence.",
                "layout",
                3,
            ),
            service(
                "Digital Strategy",
                "Comprehensive digital strategies that align with your business goals and drive measurable results.",
                "target",
                4,
            ),
        ],
        home_stats: vec![
            stat("Projects Completed", "150+", 1),
            stat("Happy Clients", "80+", 2),
            stat("Years Experience", "12", 3),
            stat("Team Members", "25", 4),
        ],
        projects: vec![
            showcase_project(
                "E-Commerce Platform Redesign",
                "Complete redesign and development of a modern e-commerce platform with advanced filtering and seamless checkout experience.",
                &["Design", "Development", "E-Commerce"],
                Some("https://example.com/project1"),
                true,
                1,
            ),
            showcase_project(
                "Corporate Brand Identity",
                "Comprehensive brand identity system including logo, guidelines, and marketing materials for a fintech startup.",
                &["Branding", "Design"],
                None,
                true,
                2,
            ),
            showcase_project(
                "Mobile App Development",
                "Native iOS and Android app for fitness tracking with real-time analytics and social features.",
                &["Mobile", "Development", "UX/UI"],
                None,
                false,
                3,
            ),
            showcase_project(
                "SaaS Dashboard Design",
                "Intuitive dashboard interface for a B2B analytics platform with complex data visualization.",
                &["Design", "SaaS", "Data Visualization"],
                None,
                true,
                4,
            ),
        ],
    }
}
