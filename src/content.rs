//! Content manifest
//!
//! Plain data handed to the page. The engines read it and never mutate it.

use serde::{Deserialize, Serialize};

/// A project entry (id label, title and an optional detail blurb)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// A role on the experience timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub company: String,
    pub role: String,
    pub period: String,
    #[serde(default)]
    pub summary: String,
}

impl Role {
    /// Single-line text shown inside the role's box
    pub fn headline(&self) -> String {
        format!("{} / {} / {}", self.company, self.role, self.period)
    }
}

/// A contact link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub label: String,
    pub href: String,
}

/// Everything the page shows, in section order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub greeting: String,
    pub intro: String,
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub experience: Vec<Role>,
    pub contacts: Vec<Contact>,
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn project(id: &str, title: &str, detail: Option<&str>) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        detail: detail.map(str::to_string),
    }
}

fn role(company: &str, role: &str, period: &str, summary: &str) -> Role {
    Role {
        company: company.to_string(),
        role: role.to_string(),
        period: period.to_string(),
        summary: summary.to_string(),
    }
}

fn contact(label: &str, href: &str) -> Contact {
    Contact {
        label: label.to_string(),
        href: href.to_string(),
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            greeting: "Hello, Im Carl Balansag".to_string(),
            intro: "I am a Full Stack Developer, from Sacramento California who likes to mix \
                    code, animation, interactivity and generative design. I work across the \
                    full JavaScript stack and have presented my work at conferences like \
                    Resonate and FITC. Formerly Google Creative Lab / Qwiki / FI. Currently \
                    Spotify."
                .to_string(),
            skills: [
                "React / Next.js",
                "TypeScript",
                "Node.js",
                "Python",
                "WebGL / Three.js",
                "Cloud Architecture",
                "UI/UX Design",
                "Creative Coding",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            projects: vec![
                project(
                    "000",
                    "Primordial Soup",
                    Some("Real-time data visualization platform with WebGL"),
                ),
                project("001", "Tensor Field", None),
                project("002", "Neuro Synth", None),
                project("003", "Recursion Toy", None),
                project("004", "Magic Beans", None),
                project("005", "Kinetic Canvas", None),
                project("006", "Math for Motion", None),
                project("007", "Tentacles", None),
                project("008", "Organis.ms", None),
                project("009", "Make Our Mark", None),
                project("010", "Unwrapaggeddon", None),
                project("011", "Muscular Hydrostats", None),
                project("012", "Plasmatic Isosurface", None),
                project("013", "Mushroom Coral", None),
                project("014", "Moon Lander", None),
                project("015", "Smack My Glitch Up", None),
                project("016", "Crystallization", None),
                project(
                    "017",
                    "WebGL GPU Particles",
                    Some("Particle system simulated entirely on the GPU"),
                ),
                project("018", "Coffee Physics", None),
                project("019", "Show Me Your Bits", None),
                project("020", "Fold Scroll", None),
            ],
            experience: vec![
                role(
                    "Google Creative Lab",
                    "Creative Technologist",
                    "Formerly",
                    "Interactive experiments and prototypes",
                ),
                role("Qwiki", "Developer", "Formerly", "Interactive video"),
                role("FI", "Developer", "Formerly", "Digital product design"),
                role("Spotify", "Full Stack Developer", "Currently", "Web platform"),
            ],
            contacts: vec![
                contact("Email", "#"),
                contact("GitHub", "#"),
                contact("LinkedIn", "#"),
                contact("Twitter", "#"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let m = Manifest::default();
        assert_eq!(m.projects.len(), 21);
        assert_eq!(m.projects[20].id, "020");
        assert_eq!(m.skills.len(), 8);
        assert!(m.intro.contains("Currently Spotify."));
        assert!(!m.intro.contains("  "));
    }

    #[test]
    fn test_partial_json() {
        let m = Manifest::from_json(
            r#"{ "greeting": "Hi", "projects": [{ "id": "1", "title": "One" }] }"#,
        )
        .unwrap();
        assert_eq!(m.greeting, "Hi");
        assert_eq!(m.projects[0].detail, None);
        // Missing fields fall back to the default content
        assert_eq!(m.skills, Manifest::default().skills);
    }

    #[test]
    fn test_headline() {
        let r = role("Spotify", "Engineer", "Currently", "");
        assert_eq!(r.headline(), "Spotify / Engineer / Currently");
    }
}
