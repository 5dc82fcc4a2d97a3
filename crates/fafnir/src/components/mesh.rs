//! # Mesh — CPU Vertex Arrays and GPU Finalization
//!
//! A [`MeshComponent`] holds raw vertex/index arrays on the CPU side.
//! [`finalize`](MeshComponent::finalize) packs them into tightly laid-out
//! vertex structs, computes the object-space bounding box, normalizes bone
//! weights, and hands the bytes to the host's
//! [`RenderDevice`](crate::services::RenderDevice) — all this core ever
//! sees of the GPU is the opaque buffer handles that come back.
//!
//! Subsets partition the index buffer by material, so one mesh can carry
//! several surfaces.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::ecs::Entity;
use crate::math::Aabb;
use crate::services::{BufferHandle, BufferKind, RenderDevice};

/// An index range bound to one material.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MeshSubset {
    pub material_id: Entity,
    pub index_offset: u32,
    pub index_count: u32,
}

/// Packed position + normal + subset index, as uploaded.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct VertexPosition {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub subset_index: u32,
}

/// Packed texture coordinate, as uploaded.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct VertexTexcoord {
    pub uv: [f32; 2],
}

/// Packed bone influences, as uploaded for skinned meshes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct VertexBone {
    pub indices: [u32; 4],
    pub weights: [f32; 4],
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshComponent {
    pub vertex_positions: Vec<Vec3>,
    pub vertex_normals: Vec<Vec3>,
    pub vertex_texcoords: Vec<Vec2>,
    pub vertex_bone_indices: Vec<[u32; 4]>,
    pub vertex_bone_weights: Vec<Vec4>,
    pub vertex_colors: Vec<u32>,
    pub indices: Vec<u32>,
    pub subsets: Vec<MeshSubset>,

    /// Object-space bounds, computed by [`finalize`](Self::finalize).
    pub aabb: Aabb,
    /// Deformed at runtime (softbody targets, morphs).
    pub dynamic: bool,

    #[serde(skip)]
    pub position_buffer: Option<BufferHandle>,
    #[serde(skip)]
    pub texcoord_buffer: Option<BufferHandle>,
    #[serde(skip)]
    pub bone_buffer: Option<BufferHandle>,
    #[serde(skip)]
    pub color_buffer: Option<BufferHandle>,
    #[serde(skip)]
    pub index_buffer: Option<BufferHandle>,
}

impl MeshComponent {
    pub fn is_skinned(&self) -> bool {
        !self.vertex_bone_weights.is_empty()
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Pack the vertex arrays, compute bounds, normalize bone weights, and
    /// upload through the device. Call once after the arrays are filled;
    /// uploading again replaces the stored handles.
    pub fn finalize(&mut self, device: &mut dyn RenderDevice) {
        // Which subset each vertex belongs to, for the packed position
        // stream. Vertices not referenced by any subset stay in subset 0.
        let mut vertex_subsets = vec![0u32; self.vertex_positions.len()];
        for (subset_index, subset) in self.subsets.iter().enumerate() {
            let start = subset.index_offset as usize;
            let end = (subset.index_offset + subset.index_count) as usize;
            for &index in self.indices.get(start..end).unwrap_or(&[]) {
                if let Some(slot) = vertex_subsets.get_mut(index as usize) {
                    *slot = subset_index as u32;
                }
            }
        }

        let mut bounds = Aabb::default();
        let mut positions = Vec::with_capacity(self.vertex_positions.len());
        for (i, &position) in self.vertex_positions.iter().enumerate() {
            let normal = self
                .vertex_normals
                .get(i)
                .copied()
                .unwrap_or(Vec3::ONE)
                .normalize_or_zero();
            positions.push(VertexPosition {
                position: position.to_array(),
                normal: normal.to_array(),
                subset_index: vertex_subsets[i],
            });
            bounds.min = bounds.min.min(position);
            bounds.max = bounds.max.max(position);
        }
        self.aabb = bounds;

        self.position_buffer =
            Some(device.upload_buffer(BufferKind::Vertex, bytemuck::cast_slice(&positions)));
        self.index_buffer =
            Some(device.upload_buffer(BufferKind::Index, bytemuck::cast_slice(&self.indices)));

        if !self.vertex_texcoords.is_empty() {
            let texcoords: Vec<VertexTexcoord> = self
                .vertex_texcoords
                .iter()
                .map(|uv| VertexTexcoord { uv: uv.to_array() })
                .collect();
            self.texcoord_buffer =
                Some(device.upload_buffer(BufferKind::Vertex, bytemuck::cast_slice(&texcoords)));
        }

        if self.is_skinned() {
            // Influence weights must sum to one per vertex.
            for weights in &mut self.vertex_bone_weights {
                let sum = weights.x + weights.y + weights.z + weights.w;
                if sum > 0.0 {
                    *weights /= sum;
                }
            }
            let bones: Vec<VertexBone> = self
                .vertex_bone_indices
                .iter()
                .zip(&self.vertex_bone_weights)
                .map(|(indices, weights)| VertexBone {
                    indices: *indices,
                    weights: weights.to_array(),
                })
                .collect();
            self.bone_buffer =
                Some(device.upload_buffer(BufferKind::Vertex, bytemuck::cast_slice(&bones)));
        }

        if !self.vertex_colors.is_empty() {
            self.color_buffer = Some(
                device.upload_buffer(BufferKind::Vertex, bytemuck::cast_slice(&self.vertex_colors)),
            );
        }
    }

    /// Reverse triangle winding in place. Re-finalize to see the change on
    /// the GPU.
    pub fn flip_culling(&mut self) {
        for triangle in self.indices.chunks_exact_mut(3) {
            triangle.swap(1, 2);
        }
    }

    /// Negate all vertex normals in place. Re-finalize to see the change on
    /// the GPU.
    pub fn flip_normals(&mut self) {
        for normal in &mut self.vertex_normals {
            *normal = -*normal;
        }
    }
}
