//! The fullscreen quad the fractal is drawn on.

/// Vertex and index data for an indexed triangle list of 2D positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadGeometry {
    /// Corner positions in normalized device coordinates.
    pub vertices: [[f32; 2]; 4],
    /// Two triangles as indices into `vertices`.
    pub indices: [u32; 6],
}

impl QuadGeometry {
    /// Two triangles covering normalized device coordinates `[-1, 1]²`.
    pub const FULLSCREEN: QuadGeometry = QuadGeometry {
        vertices: [
            [-1.0, 1.0],  // Top-left
            [1.0, 1.0],   // Top-right
            [1.0, -1.0],  // Bottom-right
            [-1.0, -1.0], // Bottom-left
        ],
        indices: [
            0, 1, 2, //
            2, 3, 0,
        ],
    };

    /// Number of indices to draw.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Vertex data as uploaded to the vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as uploaded to the index buffer.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Corner positions of each triangle.
    fn triangles(quad: &QuadGeometry) -> impl Iterator<Item = [[f32; 2]; 3]> + '_ {
        quad.indices.chunks_exact(3).map(|triangle| {
            [
                quad.vertices[triangle[0] as usize],
                quad.vertices[triangle[1] as usize],
                quad.vertices[triangle[2] as usize],
            ]
        })
    }

    /// Twice the signed area of a triangle; positive when counter-clockwise.
    fn signed_double_area(triangle: &[[f32; 2]; 3]) -> f32 {
        let [a, b, c] = triangle;
        (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
    }

    #[test]
    fn test_quad_has_four_vertices_and_six_indices() {
        let quad = QuadGeometry::FULLSCREEN;
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.index_count(), 6);
        assert_eq!(quad.vertex_bytes().len(), 4 * 2 * 4);
        assert_eq!(quad.index_bytes().len(), 6 * 4);
        assert!(quad.indices.iter().all(|&i| (i as usize) < quad.vertices.len()));
    }

    #[test]
    fn test_vertices_are_the_ndc_corners() {
        let quad = QuadGeometry::FULLSCREEN;
        for vertex in quad.vertices {
            assert_eq!(vertex[0].abs(), 1.0);
            assert_eq!(vertex[1].abs(), 1.0);
        }
        let mut corners = quad.vertices.to_vec();
        corners.sort_by(|a, b| a.partial_cmp(b).unwrap());
        corners.dedup();
        assert_eq!(corners.len(), 4);
    }

    #[test]
    fn test_triangles_share_winding_and_cover_the_square() {
        let quad = QuadGeometry::FULLSCREEN;
        let areas: Vec<f32> = triangles(&quad).map(|t| signed_double_area(&t)).collect();

        assert_eq!(areas.len(), 2);
        // same winding for both
        assert!(areas[0] * areas[1] > 0.0);
        // each covers half of the 2x2 square; together exactly all of it
        let total: f32 = areas.iter().map(|a| a.abs() / 2.0).sum();
        assert_eq!(total, 4.0);
    }

    #[test]
    fn test_triangles_only_share_the_diagonal() {
        let quad = QuadGeometry::FULLSCREEN;
        let first: Vec<u32> = quad.indices[..3].to_vec();
        let shared: Vec<u32> = quad.indices[3..]
            .iter()
            .copied()
            .filter(|i| first.contains(i))
            .collect();

        // two shared corners form the diagonal between them
        assert_eq!(shared.len(), 2);
        let [a, b] = [
            quad.vertices[shared[0] as usize],
            quad.vertices[shared[1] as usize],
        ];
        assert_eq!(a[0], -b[0]);
        assert_eq!(a[1], -b[1]);
    }
}
