//! Markup fragments inserted into the page grids. One fragment per
//! project or service entry, generated in document order.

use crate::model::Project;
use serde::Deserialize;

/// Escape a value interpolated into page markup.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// One `services.services` entry as the renderer understands it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceEntry {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

pub fn project_card(project: &Project) -> String {
    let cover = project.images.first().map(String::as_str).unwrap_or("");
    format!(
        r##"
    <div class="portfolio-item animate-on-scroll bg-white rounded-2xl overflow-hidden shadow-lg hover:shadow-2xl transition-all duration-500 hover:-translate-y-2 border border-blue-100 group" data-category="{category}">
      <div class="relative h-64 md:h-72 overflow-hidden">
        <img src="{cover}" alt="{title}" class="w-full h-full object-cover group-hover:scale-110 transition-transform duration-700">
        <div class="absolute top-4 left-4">
          <span class="inline-block px-3 py-1 bg-white/90 backdrop-blur-sm text-blue-900 text-xs rounded-full font-semibold">
            {label}
          </span>
        </div>
      </div>
      <div class="p-6 md:p-8">
        <div class="flex items-start justify-between mb-4">
          <div>
            <h3 class="text-xl md:text-2xl font-bold mb-2 text-gray-900 group-hover:text-blue-900 transition-colors">
              {title}
            </h3>
            <p class="text-gray-500 text-sm">{industry}</p>
          </div>
          <div class="w-12 h-12 bg-blue-900/10 rounded-lg flex items-center justify-center flex-shrink-0">
            <span class="text-xl">{icon}</span>
          </div>
        </div>
        <p class="text-gray-600 mb-6 leading-relaxed">
          {description}
        </p>
        <a href="#{id}" class="inline-flex items-center text-blue-900 font-semibold hover:text-blue-700 group-hover:translate-x-2 transition-all duration-300">
          View Project Details
          <svg class="w-5 h-5 ml-2" fill="none" stroke="currentColor" viewBox="0 0 24 24">
            <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M14 5l7 7m0 0l-7 7m7-7H3"/>
          </svg>
        </a>
      </div>
    </div>
  "##,
        category = project.category.as_str(),
        cover = escape_html(cover),
        title = escape_html(&project.title),
        label = project.category.label(),
        industry = escape_html(project.industry.as_deref().unwrap_or("Design")),
        icon = project.category.icon(),
        description = escape_html(&project.description),
        id = project.id,
    )
}

pub fn service_card(service: &ServiceEntry) -> String {
    format!(
        r#"
      <div class="bg-white rounded-2xl p-8 shadow-lg hover:shadow-2xl transition-all duration-500 hover:-translate-y-2 border border-blue-100 group">
        <div class="w-16 h-16 bg-gradient-to-br from-blue-900/10 to-blue-100 rounded-xl flex items-center justify-center mb-6 group-hover:scale-110 transition-transform">
          <span class="text-3xl text-blue-900">{icon}</span>
        </div>
        <h3 class="text-xl md:text-2xl font-bold mb-4 text-gray-900">{title}</h3>
        <p class="text-gray-600 mb-6 leading-relaxed">{description}</p>
        <a href="/contact" class="inline-flex items-center text-blue-900 font-semibold group-hover:text-blue-800">
          Learn More
          <svg class="w-4 h-4 ml-2 group-hover:translate-x-1 transition-transform" fill="none" stroke="currentColor" viewBox="0 0 24 24">
            <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M14 5l7 7m0 0l-7 7m7-7H3"/>
          </svg>
        </a>
      </div>
    "#,
        icon = escape_html(&service.icon),
        title = escape_html(&service.title),
        description = escape_html(&service.description),
    )
}
